//! # Edugate Config
//!
//! Configuration types for the edugate API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT verification configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`rate_limit`]: Code redemption rate limiting configuration
//! - [`entitlements`]: Sampling caps and the grant resolution policy
//!
//! # Example
//!
//! ```ignore
//! use edugate_config::{CorsConfig, EntitlementConfig, JwtConfig, RateLimitConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! let entitlement_config = EntitlementConfig::from_env();
//! ```

pub mod cors;
pub mod entitlements;
pub mod jwt;
pub mod rate_limit;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use entitlements::EntitlementConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;

/// Reads an environment variable and parses it, falling back to `default`
/// when the variable is unset or malformed.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
