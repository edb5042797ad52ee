use std::time::Duration;

/// Default delay between two reconnect attempts.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(3);

/// Default reconnect budget: one day of attempts at the default interval.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 24 * 60 * 60;

/// Fixed-interval reconnection policy.
///
/// The attempt counter covers consecutive failures only and is reset every
/// time a socket opens, so the budget bounds the length of one outage, not
/// the length of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl ReconnectPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Whether another attempt is allowed after `attempts_made` consecutive
    /// reconnect attempts.
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }

    /// Longest outage survived before the connection is declared failed.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_INTERVAL, DEFAULT_MAX_RECONNECT_ATTEMPTS)
    }
}
