//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::ConciergeError;

/// Wrap a future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, ConciergeError>>,
) -> Result<T, ConciergeError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(ConciergeError::Timeout(duration.as_millis() as u64)),
    }
}

/// Like [`with_timeout`], but a `None` duration waits indefinitely.
pub async fn with_optional_timeout<T>(
    duration: Option<Duration>,
    future: impl Future<Output = Result<T, ConciergeError>>,
) -> Result<T, ConciergeError> {
    match duration {
        Some(duration) => with_timeout(duration, future).await,
        None => future.await,
    }
}
