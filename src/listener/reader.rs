use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::config::ReaderConfig;
use super::processor::PayloadProcessor;
use crate::backoff::{self, BackoffConfig};
use crate::error::{Error, Result};
use crate::kafka::{Message, MessageReader};
use crate::wal::CommitPosition;

/// Kafka WAL reader
///
/// Implements the listener side of the pipeline:
/// 1. Fetches the next message from the queue
/// 2. Hands its value and commit position to the processing callback
/// 3. Commits processed positions on request, retrying with backoff
///
/// Fetch errors stop the listener, processing errors are logged and skipped,
/// and cancellation always stops it.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use wal_listener::kafka::memory;
/// use wal_listener::listener::{payload_processor, Reader, ReaderConfig};
///
/// #[tokio::main]
/// async fn main() -> wal_listener::Result<()> {
///     let (_writer, queue) = memory::channel("wal", 64);
///
///     let reader = Reader::new(
///         Arc::new(queue),
///         ReaderConfig::default(),
///         payload_processor(|_cancel, value, position| async move {
///             println!("{} bytes at {}", value.len(), position);
///             Ok(())
///         }),
///     )?;
///
///     let cancel = CancellationToken::new();
///     // Runs until the queue fails or `cancel` fires
///     reader.listen(&cancel).await
/// }
/// ```
pub struct Reader {
    reader: Arc<dyn MessageReader>,
    process_record: PayloadProcessor,
    backoff_config: BackoffConfig,
}

impl Reader {
    /// Create a new reader
    ///
    /// Fails if `config` does not validate.
    pub fn new(
        reader: Arc<dyn MessageReader>,
        config: ReaderConfig,
        process_record: PayloadProcessor,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            reader,
            process_record,
            backoff_config: config.commit_backoff,
        })
    }

    /// Consume messages until a fatal error or cancellation
    ///
    /// Never returns `Ok`. The returned error is either a fetch failure
    /// ([`Error::Fetch`]) or a cancellation, which callers should treat as a
    /// clean shutdown. A single reader must not be listened on from more than
    /// one task at a time.
    pub async fn listen(&self, cancel: &CancellationToken) -> Result<()> {
        debug!("kafka reader listening");

        loop {
            if cancel.is_cancelled() {
                debug!("kafka reader stopped: canceled");
                return Err(Error::Canceled);
            }

            let msg = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("kafka reader stopped while fetching: canceled");
                    return Err(Error::Canceled);
                }
                fetched = self.reader.fetch_message(cancel) => match fetched {
                    Ok(msg) => msg,
                    Err(err) => {
                        debug!(error = %err, "kafka reader stopped: fetch failed");
                        return Err(Error::Fetch(Box::new(err)));
                    }
                },
            };

            trace!(
                topic = %msg.topic,
                partition = msg.partition,
                offset = msg.offset,
                key = ?msg.key,
                "received"
            );

            let value = msg.value.clone();
            let position = CommitPosition::from(msg);

            let processed = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%position, "kafka reader stopped while processing: canceled");
                    return Err(Error::Canceled);
                }
                result = (self.process_record)(cancel.clone(), value, position.clone()) => result,
            };

            if let Err(err) = processed {
                if err.is_canceled() {
                    debug!(%position, "kafka reader stopped: processing canceled");
                    return Err(err);
                }
                // The callback owns retries and dead-lettering for its records
                error!(error = %err, %position, "processing kafka msg");
            }
        }
    }

    /// Commit the messages behind `positions` to the broker
    ///
    /// All positions are committed in a single call, retried with exponential
    /// backoff until the configured budget is spent. On exhaustion the last
    /// broker error is returned wrapped in [`Error::Commit`]. An empty slice
    /// is a no-op.
    pub async fn checkpoint(
        &self,
        cancel: &CancellationToken,
        positions: &[CommitPosition],
    ) -> Result<()> {
        if positions.is_empty() {
            return Ok(());
        }

        let messages: Vec<Message> = positions
            .iter()
            .map(|position| position.kafka_message().clone())
            .collect();
        let messages = messages.as_slice();
        let reader = self.reader.as_ref();

        let result = backoff::retry(&self.backoff_config, cancel, move || {
            reader.commit_messages(cancel, messages)
        })
        .await;

        match result {
            Ok(()) => {
                trace!(count = messages.len(), "checkpointed kafka positions");
                Ok(())
            }
            Err(err) if err.is_canceled() => Err(err),
            Err(err) => {
                error!(
                    error = %err,
                    count = messages.len(),
                    "committing kafka positions: retries exhausted"
                );
                Err(Error::Commit(Box::new(err)))
            }
        }
    }
}
