//! Optimistic-concurrency retry loop shared by the store adapters.
//!
//! A write attempt reads the project version, prepares its change, and commits
//! only if the version is unchanged. An attempt that loses the race returns an
//! `ErrorCode::Conflict` error and is retried here with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::domain::foundation::{DomainError, ErrorCode};

const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// How often and how patiently to retry a conflicting write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt. Doubles after each further conflict.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no retry.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Backoff before attempt `attempt + 1`, where `attempt` starts at 1.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_millis(10))
    }
}

/// Builds the error a write attempt returns when it lost a version race.
pub(crate) fn version_conflict(context: &str) -> DomainError {
    DomainError::new(ErrorCode::Conflict, format!("{}: project version changed", context))
}

/// Runs `attempt` until it succeeds, fails with a non-conflict error, or the
/// policy runs out of attempts.
pub(crate) async fn retry_on_conflict<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut attempt: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempt_no = 1;
    loop {
        match attempt().await {
            Err(err) if err.code == ErrorCode::Conflict => {
                if attempt_no >= policy.max_attempts {
                    tracing::warn!(
                        operation,
                        attempts = attempt_no,
                        "Write conflict persisted, giving up"
                    );
                    return Err(DomainError::new(
                        ErrorCode::Conflict,
                        format!(
                            "{} failed after {} attempts due to concurrent updates",
                            operation, attempt_no
                        ),
                    ));
                }
                let delay = policy.delay_after(attempt_no);
                tracing::warn!(
                    operation,
                    attempt = attempt_no,
                    delay_ms = delay.as_millis() as u64,
                    "Write conflict, retrying"
                );
                sleep(delay).await;
                attempt_no += 1;
            }
            other => return other,
        }
    }
}
