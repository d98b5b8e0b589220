use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Message fetched from a Kafka topic
///
/// `key` is an opaque partitioning hint and `value` is the payload handed to
/// the processing callback. The broker coordinates identify where the message
/// lives so it can be committed later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    /// Partitioning key
    pub key: Bytes,

    /// Payload
    pub value: Bytes,

    /// Topic the message was read from
    pub topic: String,

    /// Partition within the topic
    pub partition: i32,

    /// Offset within the partition
    pub offset: i64,

    /// Broker timestamp, when the client reports one
    pub time: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new Message with empty broker coordinates
    ///
    /// # Example
    ///
    /// ```
    /// use wal_listener::kafka::Message;
    ///
    /// let msg = Message::new("test-key", "test-value")
    ///     .with_topic("wal")
    ///     .with_partition(2)
    ///     .with_offset(41);
    ///
    /// assert_eq!(&msg.value[..], b"test-value");
    /// assert_eq!(msg.partition, 2);
    /// ```
    pub fn new(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            topic: String::new(),
            partition: 0,
            offset: 0,
            time: None,
        }
    }

    /// Set the topic (builder pattern)
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    /// Set the partition (builder pattern)
    pub fn with_partition(mut self, partition: i32) -> Self {
        self.partition = partition;
        self
    }

    /// Set the offset (builder pattern)
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the broker timestamp (builder pattern)
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}
