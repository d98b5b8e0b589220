//! Exponential backoff for retrying broker operations
//!
//! The policy grows the delay between attempts geometrically, adds random
//! jitter around each delay so that many consumers retrying against the same
//! broker do not line up, and gives up once the next delay would exceed the
//! configured wall-clock budget.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{Error, Result};

/// Parameters for exponential backoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Delay before the first retry (milliseconds)
    pub initial_interval_ms: u64,

    /// Upper bound for a single delay before jitter (milliseconds)
    pub max_interval_ms: u64,

    /// Growth factor applied to the interval after every retry
    pub multiplier: f64,

    /// Jitter as a fraction of the current interval (0.0 = no jitter)
    pub randomization_factor: f64,

    /// Total wall-clock time after which retries stop (milliseconds)
    pub max_elapsed_time_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 500,
            max_interval_ms: 60_000,
            multiplier: 1.5,
            randomization_factor: 0.5,
            max_elapsed_time_ms: 60_000,
        }
    }
}

impl BackoffConfig {
    /// Create a configuration with default intervals and the given budget
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use wal_listener::backoff::BackoffConfig;
    ///
    /// let config = BackoffConfig::with_max_elapsed_time(Duration::from_secs(5))
    ///     .with_initial_interval(Duration::from_millis(100))
    ///     .with_multiplier(2.0);
    ///
    /// assert_eq!(config.max_elapsed_time(), Duration::from_secs(5));
    /// ```
    pub fn with_max_elapsed_time(max_elapsed_time: Duration) -> Self {
        Self {
            max_elapsed_time_ms: duration_ms(max_elapsed_time),
            ..Default::default()
        }
    }

    /// Set the initial interval (builder pattern)
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval_ms = duration_ms(interval);
        self
    }

    /// Set the maximum interval (builder pattern)
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval_ms = duration_ms(interval);
        self
    }

    /// Set the multiplier (builder pattern)
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the randomization factor (builder pattern)
    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    pub fn max_elapsed_time(&self) -> Duration {
        Duration::from_millis(self.max_elapsed_time_ms)
    }

    /// Check that the parameters describe a usable policy
    pub fn validate(&self) -> Result<()> {
        if self.initial_interval_ms == 0 {
            return Err(Error::Config(
                "backoff initial interval must be greater than zero".to_string(),
            ));
        }
        if self.max_interval_ms < self.initial_interval_ms {
            return Err(Error::Config(format!(
                "backoff max interval ({}ms) is smaller than the initial interval ({}ms)",
                self.max_interval_ms, self.initial_interval_ms
            )));
        }
        if self.multiplier.is_nan() || self.multiplier < 1.0 {
            return Err(Error::Config(format!(
                "backoff multiplier must be at least 1.0, got {}",
                self.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(Error::Config(format!(
                "backoff randomization factor must be within [0, 1], got {}",
                self.randomization_factor
            )));
        }
        Ok(())
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Stateful exponential backoff with jitter and an elapsed-time budget
///
/// The budget is measured from construction (or the last [`reset`](Self::reset)).
#[derive(Debug)]
pub struct ExponentialBackoff {
    config: BackoffConfig,
    current_interval: Duration,
    started_at: Instant,
}

impl ExponentialBackoff {
    pub fn new(config: BackoffConfig) -> Self {
        let current_interval = config.initial_interval();
        Self {
            config,
            current_interval,
            started_at: Instant::now(),
        }
    }

    /// Restart the interval sequence and the elapsed-time budget
    pub fn reset(&mut self) {
        self.current_interval = self.config.initial_interval();
        self.started_at = Instant::now();
    }

    /// Time spent since the budget started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Delay to wait before the next attempt, or `None` once the budget is spent
    pub fn next_backoff(&mut self) -> Option<Duration> {
        let delay = randomize(self.current_interval, self.config.randomization_factor);
        if self.elapsed() + delay > self.config.max_elapsed_time() {
            return None;
        }
        self.increment_interval();
        Some(delay)
    }

    fn increment_interval(&mut self) {
        let max = self.config.max_interval();
        let next_nanos = self.current_interval.as_nanos() as f64 * self.config.multiplier;
        if next_nanos >= max.as_nanos() as f64 {
            self.current_interval = max;
        } else {
            self.current_interval = Duration::from_nanos(next_nanos as u64);
        }
    }
}

fn randomize(interval: Duration, factor: f64) -> Duration {
    if factor <= 0.0 || interval.is_zero() {
        return interval;
    }
    let secs = interval.as_secs_f64();
    let delta = factor * secs;
    let jittered = rand::rng().random_range((secs - delta)..=(secs + delta));
    Duration::from_secs_f64(jittered.max(0.0))
}

/// Run `operation` until it succeeds or the backoff budget is exhausted
///
/// Returns the last error from `operation` when the budget runs out. A
/// cancellation error from `operation` is returned immediately, and the sleep
/// between attempts returns [`Error::Canceled`] as soon as `cancel` fires.
pub async fn retry<T, F, Fut>(
    config: &BackoffConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = ExponentialBackoff::new(config.clone());
    let mut attempt: u32 = 1;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if err.is_canceled() {
            return Err(err);
        }

        let Some(delay) = backoff.next_backoff() else {
            return Err(err);
        };
        warn!(error = %err, attempt, ?delay, "operation failed, retrying");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Canceled),
            _ = time::sleep(delay) => {}
        }
        attempt += 1;
    }
}
