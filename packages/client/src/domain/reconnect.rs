//! Connection state and reconnection policy.

use std::time::Duration;

/// Delay before the first reconnection attempt
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(3);
/// Upper bound for the reconnection delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
/// Smallest delay a policy will wait between attempts
pub const MIN_DELAY: Duration = Duration::from_millis(1);

/// Transport state of a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Open,
}

/// Capped exponential backoff between connection attempts.
///
/// Attempts are never capped in number; only the delay is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    initial: Duration,
    max: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL_DELAY,
            max: DEFAULT_MAX_DELAY,
        }
    }
}

impl ReconnectPolicy {
    /// Create a policy.
    ///
    /// `initial` is raised to [`MIN_DELAY`] and `max` to `initial` if smaller.
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.max(MIN_DELAY);
        Self {
            initial,
            max: max.max(initial),
        }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Delay before the given 1-indexed attempt.
    ///
    /// Attempt 0 and 1 both wait `initial`; each further attempt doubles it.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.initial
            .checked_mul(1u32 << exp)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}
