use std::sync::Arc;
use std::time::Duration;

/// Retry policy for rate-limited (429) requests.
///
/// The legacy contract — one retry after a fixed two seconds — is the
/// default, but both the attempt cap and the backoff schedule are
/// injectable so the behavior is testable without wall-clock sleeps.
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Arc<dyn Fn(u32) -> Duration + Send + Sync>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::fixed(2, Duration::from_secs(2))
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        backoff: impl Fn(u32) -> Duration + Send + Sync + 'static,
    ) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(backoff),
        }
    }

    /// `max_attempts` total tries with the same delay between each.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        RetryPolicy::new(max_attempts, move |_| delay)
    }

    /// A single attempt: never retry.
    pub fn none() -> Self {
        RetryPolicy::fixed(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `attempt` (1-based: the delay after the
    /// first failure is `delay_before(1)`).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        (self.backoff)(attempt)
    }
}
