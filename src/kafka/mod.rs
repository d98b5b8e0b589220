//! Kafka boundary of the listener
//!
//! This module provides:
//! - `Message`: a record fetched from a topic partition
//! - `MessageReader`: the two queue operations the listener depends on
//! - `memory`: an in-process queue implementing `MessageReader`
//!
//! Network transport, partition assignment and consumer-group membership are
//! the concern of whichever client implements `MessageReader`.

pub mod memory;
pub mod message;
pub mod reader;

pub use message::Message;
pub use reader::MessageReader;
