use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backoff::BackoffConfig;
use crate::error::{Error, Result};

/// Configuration for a Kafka WAL reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Retry policy for checkpoint commits
    pub commit_backoff: BackoffConfig,

    /// Number of processed positions a `PositionBatcher` collects before a
    /// checkpoint is due
    pub checkpoint_flush_interval: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            commit_backoff: BackoffConfig::default(),
            checkpoint_flush_interval: 100,
        }
    }
}

impl ReaderConfig {
    /// Create a configuration with default values
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use wal_listener::listener::ReaderConfig;
    ///
    /// let config = ReaderConfig::new()
    ///     .with_backoff_max_elapsed_time(Duration::from_secs(10))
    ///     .with_checkpoint_flush_interval(50);
    ///
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the commit retry policy (builder pattern)
    pub fn with_commit_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.commit_backoff = backoff;
        self
    }

    /// Set only the commit retry budget (builder pattern)
    pub fn with_backoff_max_elapsed_time(mut self, max_elapsed_time: Duration) -> Self {
        self.commit_backoff.max_elapsed_time_ms =
            u64::try_from(max_elapsed_time.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the checkpoint flush interval (builder pattern)
    pub fn with_checkpoint_flush_interval(mut self, interval: usize) -> Self {
        self.checkpoint_flush_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.commit_backoff.validate()?;
        if self.checkpoint_flush_interval == 0 {
            return Err(Error::Config(
                "checkpoint flush interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ReaderConfig::default();
        assert_eq!(config.commit_backoff, BackoffConfig::default());
        assert_eq!(config.checkpoint_flush_interval, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ReaderConfig::new()
            .with_backoff_max_elapsed_time(Duration::from_millis(5))
            .with_checkpoint_flush_interval(10);

        assert_eq!(config.commit_backoff.max_elapsed_time(), Duration::from_millis(5));
        assert_eq!(config.commit_backoff.initial_interval_ms, 500);
        assert_eq!(config.checkpoint_flush_interval, 10);
    }

    #[test]
    fn test_config_validate_flush_interval() {
        let config = ReaderConfig::new().with_checkpoint_flush_interval(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_validate_backoff() {
        let config = ReaderConfig::new()
            .with_commit_backoff(BackoffConfig::default().with_multiplier(0.5));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{"commit_backoff":{"max_elapsed_time_ms":1000},"checkpoint_flush_interval":25}"#;
        let config: ReaderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.commit_backoff.max_elapsed_time(), Duration::from_secs(1));
        assert_eq!(config.commit_backoff.multiplier, 1.5);
        assert_eq!(config.checkpoint_flush_interval, 25);
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: ReaderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReaderConfig::default());
    }
}
