//! Retry with linear backoff.

use std::future::Future;
use std::time::Duration;

use crate::error::NasaError;

/// How many times to retry a failed upstream call and how long to wait.
///
/// The delay before retry `n` (0-based) is `backoff * (n + 1)`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * (attempt + 1)
    }

    /// Run `f` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent. The last error is returned.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut f: F) -> Result<T, NasaError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NasaError>>,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    tracing::debug!(
                        operation = operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying upstream call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(1))
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(400));
        assert_eq!(policy.delay_for(1), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = fast_policy()
            .execute("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, NasaError>(42)
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_recovers_after_retryable_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = fast_policy()
            .execute("test", move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(NasaError::http(503, "busy"))
                } else {
                    Ok(n)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_with_last_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = fast_policy()
            .execute("test", move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                Err(NasaError::http(500 + n as u16, "down"))
            })
            .await;
        assert_eq!(result.unwrap_err().status(), Some(502));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = fast_policy()
            .execute("test", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(NasaError::http(404, "missing"))
            })
            .await;
        assert_eq!(result.unwrap_err().status(), Some(404));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
