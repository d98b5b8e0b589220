use crate::wal::CommitPosition;

/// Count-based checkpoint policy
///
/// Collects positions of processed records and hands them back as a batch
/// once `flush_interval` positions are pending, balancing recovery distance
/// against commit overhead. Owned by whoever drives checkpoints; the listener
/// itself never batches.
///
/// # Example
///
/// ```
/// use wal_listener::kafka::Message;
/// use wal_listener::listener::PositionBatcher;
/// use wal_listener::wal::CommitPosition;
///
/// let mut batcher = PositionBatcher::new(2);
/// assert!(batcher.push(CommitPosition::from(Message::new("k", "a"))).is_none());
///
/// let batch = batcher.push(CommitPosition::from(Message::new("k", "b"))).unwrap();
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batcher.pending(), 0);
/// ```
#[derive(Debug)]
pub struct PositionBatcher {
    flush_interval: usize,
    pending: Vec<CommitPosition>,
}

impl PositionBatcher {
    /// Create a batcher that releases a batch every `flush_interval` positions
    ///
    /// An interval of 0 is treated as 1.
    pub fn new(flush_interval: usize) -> Self {
        let flush_interval = flush_interval.max(1);
        Self {
            flush_interval,
            pending: Vec::with_capacity(flush_interval),
        }
    }

    /// Add a processed position, returning a batch when one is due
    pub fn push(&mut self, position: CommitPosition) -> Option<Vec<CommitPosition>> {
        self.pending.push(position);
        if self.pending.len() >= self.flush_interval {
            return self.flush();
        }
        None
    }

    /// Drain all pending positions
    ///
    /// Typically called on shutdown or when the stream goes idle.
    pub fn flush(&mut self) -> Option<Vec<CommitPosition>> {
        if self.pending.is_empty() {
            return None;
        }
        Some(std::mem::replace(
            &mut self.pending,
            Vec::with_capacity(self.flush_interval),
        ))
    }

    /// Number of positions waiting for a checkpoint
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn flush_interval(&self) -> usize {
        self.flush_interval
    }
}
