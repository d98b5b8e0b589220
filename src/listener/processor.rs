use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::wal::CommitPosition;

/// Type alias for the record processing callback
///
/// Receives the listener's cancellation token, the record value and the
/// record's commit position. Returning an error for which
/// [`Error::is_canceled`](crate::Error::is_canceled) is true stops the
/// listener; any other error is logged and the listener moves on to the next
/// record.
pub type PayloadProcessor = Arc<
    dyn Fn(CancellationToken, Bytes, CommitPosition) -> BoxFuture<'static, Result<()>>
        + Send
        + Sync,
>;

/// Wrap an async function as a [`PayloadProcessor`]
///
/// # Example
///
/// ```
/// use wal_listener::listener::payload_processor;
///
/// let processor = payload_processor(|_cancel, value, position| async move {
///     println!("{} bytes at {}", value.len(), position);
///     Ok(())
/// });
/// ```
pub fn payload_processor<F, Fut>(f: F) -> PayloadProcessor
where
    F: Fn(CancellationToken, Bytes, CommitPosition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(
        move |cancel: CancellationToken,
              value: Bytes,
              position: CommitPosition|
              -> BoxFuture<'static, Result<()>> { Box::pin(f(cancel, value, position)) },
    )
}
