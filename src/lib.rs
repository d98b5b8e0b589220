//! Checkpointed Kafka consumer for WAL change-data-capture pipelines
//!
//! A [`Reader`](listener::Reader) pulls messages from a queue, hands each
//! payload and its [`CommitPosition`](wal::CommitPosition) to a processing
//! callback, and commits processed positions back to the broker with bounded
//! exponential backoff.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use wal_listener::kafka::memory;
//! use wal_listener::listener::{payload_processor, Reader, ReaderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (mut writer, queue) = memory::channel("wal", 64);
//!     writer.write(0, "key", "value").await?;
//!
//!     let reader = Reader::new(
//!         Arc::new(queue),
//!         ReaderConfig::default(),
//!         payload_processor(|_cancel, _value, _position| async move { Ok(()) }),
//!     )?;
//!
//!     let cancel = CancellationToken::new();
//!     let err = reader.listen(&cancel).await.unwrap_err();
//!     println!("listener stopped: {}", err);
//!     Ok(())
//! }
//! ```

pub mod backoff;
pub mod error;
pub mod kafka;
pub mod listener;
pub mod wal;

pub use error::{Error, Result};
