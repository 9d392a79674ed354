//! Bounded retry with exponential backoff for a single provider.
//!
//! Only errors classified [`RetryClass::WithBackoff`] are retried. The wait
//! between attempts goes through a [`Sleeper`], so the schedule is exact and
//! tests never wait on a real timer.
//!
//! Default schedule: 3 attempts, waiting 250 ms before the second attempt and
//! 500 ms before the third. Delays double per retry and are capped at 2 s.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::clock::Sleeper;
use crate::errors::{ProviderError, RetryClass};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(250);
const DEFAULT_BACKOFF_FACTOR: u32 = 2;
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(2);

/// Retry schedule configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total calls allowed per provider, first call included. Zero behaves as one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: u32,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (0-indexed).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = self.backoff_factor.saturating_pow(retry);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    fn attempt_limit(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Retry state for one provider call sequence.
#[derive(Debug)]
pub struct Backoff<'a> {
    config: &'a RetryConfig,
    /// Calls started so far.
    attempt: u32,
    /// Delay to apply if the current call fails with a retryable error.
    next_delay: Duration,
}

impl<'a> Backoff<'a> {
    pub fn new(config: &'a RetryConfig) -> Self {
        Self {
            config,
            attempt: 0,
            next_delay: config.delay_for_retry(0),
        }
    }

    /// Mark the start of a call and return its 1-based number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Decide what follows a failed call.
    ///
    /// Returns the delay to wait before the next call, or `None` when the error
    /// is not retryable or the attempt budget is spent.
    pub fn on_failure(&mut self, error: &ProviderError) -> Option<Duration> {
        if error.retry_class() == RetryClass::Never {
            return None;
        }
        if self.attempt >= self.config.attempt_limit() {
            return None;
        }

        let delay = self.next_delay;
        self.next_delay = self.config.delay_for_retry(self.attempt);
        Some(delay)
    }
}

/// Result of a retried provider call.
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T, ProviderError>,
    /// Number of calls made.
    pub attempts: u32,
}

/// Retry wrapper applied to each provider independently.
#[derive(Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { config, sleeper }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is exhausted.
    pub async fn run<T, F, Fut>(&self, provider: &str, mut op: F) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut backoff = Backoff::new(&self.config);

        loop {
            let attempt = backoff.begin_attempt();

            let error = match op().await {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                    }
                }
                Err(e) => e,
            };

            match backoff.on_failure(&error) {
                Some(delay) => {
                    debug!(
                        "Provider '{}' attempt {} failed with {}, retrying in {:?}",
                        provider, attempt, error, delay
                    );
                    self.sleeper.sleep(delay).await;
                }
                None => {
                    debug!(
                        "Provider '{}' attempt {} failed with {}, giving up",
                        provider, attempt, error
                    );
                    return RetryOutcome {
                        result: Err(error),
                        attempts: attempt,
                    };
                }
            }
        }
    }
}
