//! Kafka WAL listener
//!
//! This module provides:
//! - `Reader`: the consume loop (`listen`) and the checkpointer (`checkpoint`)
//! - `ReaderConfig`: configuration for readers
//! - `PayloadProcessor`: the record processing callback
//! - `PositionBatcher`: a count-based checkpoint policy for callers
//!
//! # Checkpointing
//!
//! The listener never commits on its own. The processing callback (or the
//! component it forwards records to) collects the positions of records it has
//! handled and calls `Reader::checkpoint` when it is safe to advance the
//! recovery point. `PositionBatcher` implements the common "every N records"
//! policy.

pub mod batcher;
pub mod config;
pub mod processor;
pub mod reader;

pub use batcher::PositionBatcher;
pub use config::ReaderConfig;
pub use processor::{payload_processor, PayloadProcessor};
pub use reader::Reader;
