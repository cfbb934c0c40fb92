//! Retry utility for handling transient errors in async operations
//!
//! Provides a configurable retry policy with exponential backoff and jitter.
//! Only errors the caller classifies as transient are retried; everything
//! else fails fast on the first attempt.

use std::time::Duration;
use tokio::time::sleep;

/// Configurable retry policy for async operations
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay after the given failed attempt (0-based): doubled per
    /// attempt, capped at `max_delay`, with additive jitter on top.
    fn delay_after(&self, attempt: usize) -> Duration {
        let shift = attempt.min(16) as u32;
        let exponential = self
            .base_delay
            .saturating_mul(1u32.checked_shl(shift).unwrap_or(u32::MAX));
        let capped = exponential.min(self.max_delay);
        capped + jitter(capped)
    }
}

/// Up to 25% additive jitter so clients that failed together do not retry in
/// lockstep. Derived from the wall clock's sub-second nanos, which is enough
/// entropy for desynchronization.
fn jitter(delay: Duration) -> Duration {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0) as u64;
    let quarter_ms = (delay.as_millis() as u64 / 4).max(1);
    Duration::from_millis(nanos % quarter_ms)
}

/// Execute an async operation, retrying transient failures with backoff
///
/// `is_transient` decides whether a given error is worth another attempt;
/// non-transient errors are returned immediately.
///
/// # Examples
/// ```rust
/// use scandock::core::retry::{retry_async, RetryPolicy};
///
/// # async fn example() -> Result<String, String> {
/// let result = retry_async(
///     "manifest_lookup",
///     RetryPolicy::default(),
///     |_err: &String| true,
///     || async {
///         // Your async operation here
///         Ok::<String, String>("success".to_string())
///     },
/// )
/// .await?;
/// # Ok(result)
/// # }
/// ```
pub async fn retry_async<F, T, E, Fut, P>(
    operation_name: &str,
    policy: RetryPolicy,
    is_transient: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut last_error = None;

    for attempt in 0..policy.max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !is_transient(&error) {
                    log::debug!(
                        "Operation '{}' failed with non-transient error, not retrying: {}",
                        operation_name,
                        error
                    );
                    return Err(error);
                }
                last_error = Some(error);
                if attempt < policy.max_attempts - 1 {
                    let delay = policy.delay_after(attempt);
                    log::debug!(
                        "Operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                        operation_name,
                        attempt + 1,
                        policy.max_attempts,
                        delay,
                        last_error.as_ref().unwrap()
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    Err(last_error.unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_retry_succeeds_immediately() {
        let result = retry_async(
            "test_operation",
            RetryPolicy::default(),
            |_: &String| true,
            || async { Ok::<i32, String>(42) },
        )
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failures() {
        use std::sync::{Arc, Mutex};
        let attempt_count = Arc::new(Mutex::new(0));
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        };

        let result = retry_async("test_operation", policy, |_: &&str| true, || {
            let count = attempt_count.clone();
            async move {
                let mut attempts = count.lock().unwrap();
                *attempts += 1;
                if *attempts < 3 {
                    Err("temporary failure")
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(*attempt_count.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        use std::sync::{Arc, Mutex};
        let attempt_count = Arc::new(Mutex::new(0));
        let policy = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(10),
        };

        let result = retry_async("test_operation", policy, |_: &&str| true, || {
            let count = attempt_count.clone();
            async move {
                let mut attempts = count.lock().unwrap();
                *attempts += 1;
                Err::<i32, &str>("persistent failure")
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), "persistent failure");
        assert_eq!(*attempt_count.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_fails_fast() {
        use std::sync::{Arc, Mutex};
        let attempt_count = Arc::new(Mutex::new(0));

        let result = retry_async(
            "test_operation",
            RetryPolicy::default(),
            |err: &&str| *err != "fatal",
            || {
                let count = attempt_count.clone();
                async move {
                    let mut attempts = count.lock().unwrap();
                    *attempts += 1;
                    Err::<i32, &str>("fatal")
                }
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), "fatal");
        assert_eq!(*attempt_count.lock().unwrap(), 1);
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(400),
        };

        // Jitter is additive and bounded by a quarter of the capped delay.
        let first = policy.delay_after(0);
        assert!(first >= Duration::from_millis(100));
        assert!(first < Duration::from_millis(200));

        let late = policy.delay_after(8);
        assert!(late >= Duration::from_millis(400));
        assert!(late < Duration::from_millis(600));
    }
}
