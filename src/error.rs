//! Error types for the WAL listener

use thiserror::Error;

/// Result type for listener and queue operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while consuming and checkpointing messages
#[derive(Debug, Error)]
pub enum Error {
    /// The active operation was canceled by its caller
    #[error("operation canceled")]
    Canceled,

    /// Fetching the next message from the queue failed
    #[error("reading from kafka: {0}")]
    Fetch(#[source] Box<Error>),

    /// Committing positions to the broker failed after all retries
    #[error("committing messages: {0}")]
    Commit(#[source] Box<Error>),

    /// Transport or broker failure reported by a queue client
    #[error("Broker error: {0}")]
    Broker(String),

    /// The queue was closed and no more messages will be delivered
    #[error("queue closed")]
    Closed,

    /// Failure reported by a processing callback
    #[error("Processing error: {0}")]
    Processing(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if this error, or the error it wraps, is a cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self.root_cause(), Error::Canceled)
    }

    /// Unwrap `Fetch` and `Commit` wrappers down to the underlying error.
    ///
    /// # Example
    ///
    /// ```
    /// use wal_listener::Error;
    ///
    /// let err = Error::Fetch(Box::new(Error::Broker("connection reset".to_string())));
    /// assert!(matches!(err.root_cause(), Error::Broker(msg) if msg == "connection reset"));
    /// ```
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::Fetch(inner) | Error::Commit(inner) = current {
            current = &**inner;
        }
        current
    }
}
