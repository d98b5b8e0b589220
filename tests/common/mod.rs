#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use wal_listener::backoff::BackoffConfig;
use wal_listener::kafka::{Message, MessageReader};
use wal_listener::listener::{PayloadProcessor, Reader, ReaderConfig};
use wal_listener::{Error, Result};

type FetchMessageFn = Box<dyn Fn(usize) -> Result<Message> + Send + Sync>;
type CommitMessagesFn = Box<dyn Fn(usize, &[Message]) -> Result<()> + Send + Sync>;

/// Closure-driven `MessageReader` double
///
/// Each closure receives the 1-based call number. Calls without a configured
/// closure fail with a broker error.
#[derive(Default)]
pub struct MockReader {
    fetch_message_fn: Option<FetchMessageFn>,
    commit_messages_fn: Option<CommitMessagesFn>,
    fetch_calls: AtomicUsize,
    commit_calls: AtomicUsize,
}

impl MockReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fetch<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) -> Result<Message> + Send + Sync + 'static,
    {
        self.fetch_message_fn = Some(Box::new(f));
        self
    }

    pub fn with_commit<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, &[Message]) -> Result<()> + Send + Sync + 'static,
    {
        self.commit_messages_fn = Some(Box::new(f));
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageReader for MockReader {
    async fn fetch_message(&self, _cancel: &CancellationToken) -> Result<Message> {
        // Keep a listener spinning on an always-ready mock from starving the runtime
        tokio::task::yield_now().await;

        let call = self.fetch_calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.fetch_message_fn {
            Some(f) => f(call),
            None => Err(Error::Broker("fetch_message: unexpected call".to_string())),
        }
    }

    async fn commit_messages(&self, _cancel: &CancellationToken, messages: &[Message]) -> Result<()> {
        let call = self.commit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.commit_messages_fn {
            Some(f) => f(call, messages),
            None => Err(Error::Broker("commit_messages: unexpected call".to_string())),
        }
    }
}

pub fn test_message() -> Message {
    Message::new("test-key", "test-value").with_topic("test-topic")
}

pub fn test_error() -> Error {
    Error::Broker("oh noes".to_string())
}

pub fn is_test_error(err: &Error) -> bool {
    matches!(err.root_cause(), Error::Broker(msg) if msg == "oh noes")
}

/// Reader with a commit retry budget of `max_elapsed`
pub fn new_reader(
    mock: Arc<MockReader>,
    max_elapsed: Duration,
    process_record: PayloadProcessor,
) -> Reader {
    let config = ReaderConfig::new().with_backoff_max_elapsed_time(max_elapsed);
    Reader::new(mock, config, process_record).unwrap()
}

/// Reader with a fully specified commit retry policy
pub fn new_reader_with_backoff(
    mock: Arc<MockReader>,
    backoff: BackoffConfig,
    process_record: PayloadProcessor,
) -> Reader {
    let config = ReaderConfig::new().with_commit_backoff(backoff);
    Reader::new(mock, config, process_record).unwrap()
}
