//! Rate limiting configuration for code redemption.
//!
//! Redemption attempts are limited per student using the Governor crate, so
//! a single account cannot brute-force the code space.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_REDEEM_PER_MINUTE`: Attempts replenished per minute (default: 10)
//! - `RATE_LIMIT_REDEEM_BURST_SIZE`: Maximum attempts in a burst (default: 5)
//! - `RATE_LIMIT_CLEANUP_INTERVAL_SECS`: How often idle per-student buckets
//!   are dropped (default: 60)
//!
//! # Rate Limiting Strategy
//!
//! The rate limiter uses a token bucket algorithm:
//!
//! - Tokens are added at the configured rate
//! - Each attempt consumes one token
//! - Burst size defines the maximum tokens that can accumulate
//! - Attempts are rejected when no tokens are available
//!
//! # Example
//!
//! ```ignore
//! use edugate_config::RateLimitConfig;
//! use governor::RateLimiter;
//!
//! let config = RateLimitConfig::from_env();
//! let limiter = RateLimiter::keyed(config.redeem_quota());
//! ```

use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;

use crate::env_or;

/// Rate limit configuration for the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Redemption attempts replenished per minute, per student.
    pub redeem_per_minute: u32,

    /// Maximum redemption attempts a student can make in a burst.
    pub redeem_burst_size: u32,

    /// Seconds between sweeps of buckets that have fully replenished.
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            redeem_per_minute: 10,
            redeem_burst_size: 5,
            cleanup_interval_secs: 60,
        }
    }
}

impl RateLimitConfig {
    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Falls back to default values if environment variables are not set
    /// or cannot be parsed.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redeem_per_minute: env_or("RATE_LIMIT_REDEEM_PER_MINUTE", defaults.redeem_per_minute),
            redeem_burst_size: env_or("RATE_LIMIT_REDEEM_BURST_SIZE", defaults.redeem_burst_size),
            cleanup_interval_secs: env_or(
                "RATE_LIMIT_CLEANUP_INTERVAL_SECS",
                defaults.cleanup_interval_secs,
            ),
        }
    }

    /// Builds the governor quota for redemption attempts.
    ///
    /// Zero values are raised to one.
    #[must_use]
    pub fn redeem_quota(&self) -> Quota {
        let per_minute = NonZeroU32::new(self.redeem_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.redeem_burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_minute(per_minute).allow_burst(burst)
    }

    /// Interval of the limiter sweep, never below one second.
    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::RateLimiter;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.redeem_per_minute, 10);
        assert_eq!(config.redeem_burst_size, 5);
        assert_eq!(config.cleanup_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_quota_burst_is_enforced_per_key() {
        let config = RateLimitConfig {
            redeem_per_minute: 1,
            redeem_burst_size: 2,
            ..Default::default()
        };
        let limiter = RateLimiter::keyed(config.redeem_quota());

        assert!(limiter.check_key(&"a").is_ok());
        assert!(limiter.check_key(&"a").is_ok());
        assert!(limiter.check_key(&"a").is_err());
        assert!(limiter.check_key(&"b").is_ok());
    }

    #[test]
    fn test_zero_values_are_raised() {
        let config = RateLimitConfig {
            redeem_per_minute: 0,
            redeem_burst_size: 0,
            cleanup_interval_secs: 0,
        };
        let limiter = RateLimiter::keyed(config.redeem_quota());
        assert!(limiter.check_key(&1u32).is_ok());
        assert_eq!(config.cleanup_interval(), Duration::from_secs(1));
    }
}
