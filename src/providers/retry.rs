//! Retry with backoff for catalog calls.
//!
//! One `RetryPolicy` is shared by every request a provider makes, so the
//! page listing and the per-creature evolution lookups back off the same way.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::error::{DataError, FetchError};

/// Growth of the wait between attempts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backoff {
    /// `base` before every retry.
    Fixed,
    /// `base * n` before retry `n`.
    #[default]
    Linear,
    /// `base * 2^(n-1)` before retry `n`.
    Exponential,
}

/// How many times a failed fetch is retried and how long to wait in between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total attempts including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before retry number `retry` (1-based).
    ///
    /// ```
    /// use creature_match::providers::{Backoff, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::default().with_backoff(Backoff::Exponential);
    /// assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    /// ```
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let retry = retry.max(1);
        let factor = match self.backoff {
            Backoff::Fixed => 1,
            Backoff::Linear => retry,
            Backoff::Exponential => 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX),
        };
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds or the attempts run out.
    ///
    /// `what` names the request in log output. Exhaustion becomes
    /// `DataError::Unavailable` carrying the last failure.
    pub fn run<T, S: Sleeper + ?Sized>(
        &self,
        sleeper: &mut S,
        what: &str,
        mut op: impl FnMut() -> Result<T, FetchError>,
    ) -> Result<T, DataError> {
        let mut retry = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay_for(retry);
                    warn!(
                        request = what,
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying catalog request"
                    );
                    sleeper.sleep(delay);
                }
                Err(err) => {
                    return Err(DataError::Unavailable {
                        attempts: retry + 1,
                        reason: err.to_string(),
                    });
                }
            }
        }
    }
}

/// Blocking wait between retries.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested waits without sleeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingSleeper {
    slept: Vec<Duration>,
}

impl RecordingSleeper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order.
    #[must_use]
    pub fn slept(&self) -> &[Duration] {
        &self.slept
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.slept.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.slept.push(duration);
    }
}
