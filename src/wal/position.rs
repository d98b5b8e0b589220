use std::fmt;

use crate::kafka::Message;

/// Opaque token identifying where a record lives in the queue
///
/// Derived from the fetched message and only meaningful to the checkpoint
/// operation, which commits the message it wraps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitPosition {
    kafka_pos: Message,
}

impl CommitPosition {
    /// The message this position acknowledges
    pub fn kafka_message(&self) -> &Message {
        &self.kafka_pos
    }

    pub fn into_kafka_message(self) -> Message {
        self.kafka_pos
    }
}

impl From<Message> for CommitPosition {
    fn from(msg: Message) -> Self {
        Self { kafka_pos: msg }
    }
}

impl fmt::Display for CommitPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.kafka_pos.topic, self.kafka_pos.partition, self.kafka_pos.offset
        )
    }
}
