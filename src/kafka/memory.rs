//! In-memory queue implementing [`MessageReader`]
//!
//! Useful for local runs and tests that need a real blocking fetch without a
//! broker. Offsets are assigned per partition starting at 0; committed offsets
//! are tracked per (topic, partition).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::{Message, MessageReader};
use crate::error::{Error, Result};

/// Create a connected writer/reader pair for `topic`
///
/// # Example
///
/// ```
/// use tokio_util::sync::CancellationToken;
/// use wal_listener::kafka::{memory, MessageReader};
///
/// #[tokio::main]
/// async fn main() -> wal_listener::Result<()> {
///     let (mut writer, reader) = memory::channel("wal", 16);
///     writer.write(0, "key", "value").await?;
///
///     let cancel = CancellationToken::new();
///     let msg = reader.fetch_message(&cancel).await?;
///     assert_eq!(msg.offset, 0);
///
///     reader.commit_messages(&cancel, &[msg]).await?;
///     assert_eq!(reader.committed_offset("wal", 0), Some(0));
///     Ok(())
/// }
/// ```
pub fn channel(topic: impl Into<String>, capacity: usize) -> (InMemoryWriter, InMemoryReader) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let writer = InMemoryWriter {
        topic: topic.into(),
        sender,
        next_offsets: HashMap::new(),
    };
    let reader = InMemoryReader {
        receiver: AsyncMutex::new(receiver),
        committed: Mutex::new(HashMap::new()),
    };
    (writer, reader)
}

/// Producing half of an in-memory queue
///
/// Dropping the writer closes the queue: pending messages are still delivered,
/// after which fetches fail with [`Error::Closed`].
pub struct InMemoryWriter {
    topic: String,
    sender: mpsc::Sender<Message>,
    next_offsets: HashMap<i32, i64>,
}

impl InMemoryWriter {
    /// Append a message to `partition`, returning its offset
    pub async fn write(
        &mut self,
        partition: i32,
        key: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Result<i64> {
        let next = self.next_offsets.entry(partition).or_insert(0);
        let offset = *next;

        let msg = Message::new(key, value)
            .with_topic(self.topic.clone())
            .with_partition(partition)
            .with_offset(offset)
            .with_time(Utc::now());

        self.sender.send(msg).await.map_err(|_| Error::Closed)?;
        *next += 1;
        Ok(offset)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Consuming half of an in-memory queue
pub struct InMemoryReader {
    receiver: AsyncMutex<mpsc::Receiver<Message>>,
    committed: Mutex<HashMap<(String, i32), i64>>,
}

impl InMemoryReader {
    /// Highest committed offset for a partition, if any
    pub fn committed_offset(&self, topic: &str, partition: i32) -> Option<i64> {
        self.committed()
            .get(&(topic.to_string(), partition))
            .copied()
    }

    fn committed(&self) -> MutexGuard<'_, HashMap<(String, i32), i64>> {
        self.committed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MessageReader for InMemoryReader {
    async fn fetch_message(&self, cancel: &CancellationToken) -> Result<Message> {
        let mut receiver = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Canceled),
            receiver = self.receiver.lock() => receiver,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Canceled),
            msg = receiver.recv() => msg.ok_or(Error::Closed),
        }
    }

    async fn commit_messages(&self, cancel: &CancellationToken, messages: &[Message]) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }

        let mut committed = self.committed();
        for msg in messages {
            let offset = committed
                .entry((msg.topic.clone(), msg.partition))
                .or_insert(msg.offset);
            // Recommitting an older offset never moves the partition backwards
            *offset = (*offset).max(msg.offset);
            trace!(topic = %msg.topic, partition = msg.partition, offset = msg.offset, "committed");
        }
        Ok(())
    }
}
