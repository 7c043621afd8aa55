use std::time::Duration;

/// Classification for retry policy.
///
/// Used to determine how the service should respond to errors from the
/// provider.
///
/// | Class | Retry? |
/// |-------|--------|
/// | `Never` | No |
/// | `WithBackoff` | Yes, until the attempt budget is spent |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad request, unknown symbol, or terminal failure.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry with an increasing delay between attempts.
    ///
    /// Used for transient provider and network failures where a later
    /// attempt may succeed.
    WithBackoff,
}

/// Bounded retry schedule with linearly increasing backoff.
///
/// The delay before attempt `n + 1` is `base_delay * n`, so with the
/// default 1 second base the waits are 1s, 2s. Tests inject
/// `Duration::ZERO` to run the schedule without real sleeps.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Base delay multiplied by the attempt number.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
