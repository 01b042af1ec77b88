//! Reconnection backoff policy.

use std::time::Duration;

/// Exponential backoff for automatic reconnection.
///
/// The delay before attempt `n` (1-indexed) is `base * 2^(n-1)`; the policy
/// is exhausted once `max_attempts` attempts have failed. Pure computation,
/// no timers or processes involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first reconnection attempt.
    pub base: Duration,
    /// Total attempts before reconnection is abandoned.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(2),
            max_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// Delay before the given attempt (1-indexed).
    ///
    /// Saturates instead of overflowing for absurd attempt numbers.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base.saturating_mul(1u32 << exp)
    }

    /// True once `failed_attempts` have been spent and no further attempt
    /// may be scheduled.
    #[must_use]
    pub const fn is_exhausted(&self, failed_attempts: u32) -> bool {
        failed_attempts >= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delays_double_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
    }

    #[test]
    fn first_attempt_uses_base() {
        let policy = RetryPolicy {
            base: Duration::from_millis(250),
            max_attempts: 5,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for(4), Duration::from_millis(2000));
    }

    #[test]
    fn exhaustion_boundary() {
        let policy = RetryPolicy::default();
        assert!(!policy.is_exhausted(0));
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
        assert!(policy.is_exhausted(4));
    }

    #[test]
    fn zero_max_attempts_is_immediately_exhausted() {
        let policy = RetryPolicy {
            base: Duration::from_secs(1),
            max_attempts: 0,
        };
        assert!(policy.is_exhausted(0));
    }

    #[test]
    fn huge_attempt_saturates_instead_of_panicking() {
        let policy = RetryPolicy::default();
        let delay = policy.delay_for(u32::MAX);
        assert!(delay >= policy.delay_for(31));
    }

    #[test]
    fn deterministic() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(2), policy.delay_for(2));
    }
}
