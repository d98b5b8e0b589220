//! Queue capability consumed by the listener

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::message::Message;
use crate::error::Result;

/// Interface a Kafka client must satisfy to feed a listener
///
/// Implementations own the transport: connection handling, partition
/// assignment and retrying of fetches all live behind this trait.
#[async_trait]
pub trait MessageReader: Send + Sync {
    /// Fetch the next message for the bound subscription
    ///
    /// May block until data is available. Must return promptly with
    /// [`Error::Canceled`](crate::Error::Canceled) once `cancel` fires.
    async fn fetch_message(&self, cancel: &CancellationToken) -> Result<Message>;

    /// Durably acknowledge previously fetched messages at the broker
    ///
    /// Committing an already committed message must be harmless.
    async fn commit_messages(&self, cancel: &CancellationToken, messages: &[Message]) -> Result<()>;
}
