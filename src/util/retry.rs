//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::error::ConciergeError;

/// Retry policy for calls to the model server and search APIs.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that runs the operation exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Execute an async operation with retry.
    ///
    /// Only errors classified as retryable are retried. A rate-limit hint
    /// from the server is used as the floor for the next sleep.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ConciergeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ConciergeError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_retryable() || attempt >= max_attempts {
                return Err(error);
            }

            let mut sleep_for = jittered(backoff);
            if let ConciergeError::RateLimited {
                retry_after_ms: Some(ms),
            } = &error
            {
                sleep_for = sleep_for.max(Duration::from_millis(*ms));
            }

            tracing::warn!(
                attempt,
                max_attempts,
                sleep_ms = sleep_for.as_millis() as u64,
                error = %error,
                "Retrying after error"
            );
            tokio::time::sleep(sleep_for).await;

            backoff = next_backoff(backoff, self.multiplier, self.max_backoff);
        }
    }
}

// Backoff never shrinks; a negative or NaN multiplier counts as 1.
fn next_backoff(current: Duration, multiplier: f64, max_backoff: Duration) -> Duration {
    let multiplier = multiplier.max(1.0);
    let next = (current.as_secs_f64() * multiplier).min(max_backoff.as_secs_f64());
    Duration::try_from_secs_f64(next).unwrap_or(max_backoff)
}

// 75%-125% of the base backoff.
fn jittered(backoff: Duration) -> Duration {
    let factor = 0.75 + rand_factor() * 0.5;
    Duration::try_from_secs_f64(backoff.as_secs_f64() * factor).unwrap_or(backoff)
}

/// Pseudo-random factor in [0, 1) derived from a fresh uuid.
fn rand_factor() -> f64 {
    let bits = uuid::Uuid::new_v4().as_u128();
    (bits % 10_000) as f64 / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_backoff_grows_up_to_the_cap() {
        let cap = Duration::from_millis(300);
        assert_eq!(
            next_backoff(Duration::from_millis(100), 2.0, cap),
            Duration::from_millis(200)
        );
        assert_eq!(next_backoff(Duration::from_millis(200), 2.0, cap), cap);
    }

    #[test]
    fn next_backoff_ignores_negative_and_nan_multipliers() {
        let base = Duration::from_millis(100);
        let cap = Duration::from_secs(1);
        assert_eq!(next_backoff(base, -3.0, cap), base);
        assert_eq!(next_backoff(base, f64::NAN, cap), base);
        assert_eq!(next_backoff(base, f64::INFINITY, cap), cap);
    }
}
