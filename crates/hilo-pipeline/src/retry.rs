//! Exponential backoff for source operations.

use std::future::Future;
use std::time::Duration;

use hilo_config::RetryConfig;

use crate::error::SourceError;

/// Backoff schedule: `initial`, doubled after every failure, capped at `max`,
/// for at most `attempts` tries in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub attempts: u32,
}

impl RetryPolicy {
    #[must_use]
    pub const fn from_config(config: &RetryConfig) -> Self {
        Self {
            initial: Duration::from_secs(config.retry_initial_backoff_s),
            max: Duration::from_secs(config.retry_max_backoff_s),
            attempts: config.retry_max_attempts,
        }
    }

    /// Delay after the `failures`-th consecutive failure (1-based).
    #[must_use]
    pub fn backoff(&self, failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(failures.saturating_sub(1));
        self.initial.saturating_mul(factor).min(self.max)
    }

    /// Run `op` until it succeeds, fails with a non-transient error, or the
    /// attempts are exhausted. Returns the last error in the latter cases.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, SourceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let mut failures = 0u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && failures + 1 < self.attempts => {
                    failures += 1;
                    let delay = self.backoff(failures);
                    tracing::warn!(
                        operation = what,
                        attempt = failures,
                        delay_s = delay.as_secs_f64(),
                        error = %err,
                        "retrying source operation"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (1..=8).map(|n| policy.backoff(n).as_secs()).collect();
        assert_eq!(delays, [1, 2, 4, 8, 16, 32, 60, 60]);
        assert_eq!(policy.backoff(200).as_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried_with_backoff() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let value = policy
            .run("list_chats", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err(SourceError::Transient("busy".into()))
                } else {
                    Ok(7)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), Duration::from_secs(1 + 2 + 4));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_last_attempt() {
        let policy = RetryPolicy {
            attempts: 3,
            ..RetryPolicy::default()
        };
        let calls = AtomicU32::new(0);
        let err = policy
            .run("list_chats", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(SourceError::Transient("down".into()))
            })
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::default()
            .run("iter_messages", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(SourceError::MissingMessages {
                    chat_id: 1,
                    dir: "/nowhere".into(),
                })
            })
            .await
            .unwrap_err();
        assert!(!err.is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
