//! Optimistic transaction retry with exponential backoff.
//!
//! A store attempt reads a versioned snapshot, checks it, and commits only
//! if the version is unchanged. A stale version yields
//! [`Attempt::Conflict`] and [`run_optimistic`] reruns the whole attempt,
//! up to [`RetryPolicy::max_attempts`] times.

use std::time::Duration;

use crate::error::PortalError;

/// Outcome of one optimistic attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The attempt committed and produced a value.
    Committed(T),
    /// A concurrent writer changed the read set; nothing was written.
    Conflict,
}

/// Bounded retry budget for optimistic transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Treated as at least 1.
    pub max_attempts: u32,
    /// Delay after the first conflict; doubled for each further conflict.
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the `attempt`-th (1-based) conflict.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Runs `attempt_fn` until it commits, fails, or the budget is spent.
///
/// The closure receives the 1-based attempt number. Errors returned by the
/// closure are propagated immediately and never retried.
///
/// # Errors
///
/// Returns the closure's error unchanged, or
/// [`PortalError::TransactionAborted`] once every attempt conflicted.
pub async fn run_optimistic<T, F, Fut>(
    policy: &RetryPolicy,
    mut attempt_fn: F,
) -> Result<T, PortalError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Attempt<T>, PortalError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match attempt_fn(attempt).await? {
            Attempt::Committed(value) => return Ok(value),
            Attempt::Conflict => {
                tracing::debug!(attempt, "optimistic transaction conflict");
                if attempt < max_attempts {
                    tokio::time::sleep(policy.backoff(attempt)).await;
                }
            }
        }
    }
    tracing::debug!(attempts = max_attempts, "optimistic transaction retries exhausted");
    Err(PortalError::TransactionAborted {
        attempts: max_attempts,
    })
}
