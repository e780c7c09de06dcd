use std::sync::Arc;
use std::time::Duration;

use edugate_config::{CorsConfig, EntitlementConfig, JwtConfig, RateLimitConfig};
use edugate_entitlements::{RandomSampler, ResolutionPolicy, Sampler};
use edugate_models::StudentId;
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::debug;

/// Per-student limiter guarding code redemption.
pub type RedeemLimiter = DefaultKeyedRateLimiter<StudentId>;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub entitlement_config: EntitlementConfig,
    pub sampler: Arc<dyn Sampler>,
    pub redeem_limiter: Arc<RedeemLimiter>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("entitlement_config", &self.entitlement_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
        entitlement_config: EntitlementConfig,
        sampler: Arc<dyn Sampler>,
    ) -> Self {
        let redeem_limiter = Arc::new(RateLimiter::keyed(rate_limit_config.redeem_quota()));
        Self {
            db,
            jwt_config,
            cors_config,
            rate_limit_config,
            entitlement_config,
            sampler,
            redeem_limiter,
        }
    }

    pub fn resolution_policy(&self) -> ResolutionPolicy {
        ResolutionPolicy {
            files_grant_videos: self.entitlement_config.files_grant_videos,
        }
    }
}

/// Periodically drops limiter buckets that have fully replenished, so the
/// keyed state only holds students who redeemed recently.
pub fn spawn_limiter_cleanup(limiter: Arc<RedeemLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
            debug!(tracked = limiter.len(), "Redeem limiter swept");
        }
    })
}

pub fn init_app_state(db: PgPool) -> AppState {
    AppState::new(
        db,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
        EntitlementConfig::from_env(),
        Arc::new(RandomSampler),
    )
}

/// State for tests: fixed secrets, default limits and a seeded sampler.
#[cfg(feature = "test-utils")]
pub fn test_app_state(db: PgPool) -> AppState {
    AppState::new(
        db,
        JwtConfig {
            secret: "test-secret-key".to_string(),
            access_token_expiry: 3600,
        },
        CorsConfig::parse("*"),
        RateLimitConfig::default(),
        EntitlementConfig::default(),
        Arc::new(edugate_entitlements::SeededSampler::new(42)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::Quota;

    #[tokio::test]
    async fn test_limiter_cleanup_drops_replenished_buckets() {
        let quota = Quota::with_period(Duration::from_millis(50)).unwrap();
        let limiter: Arc<RedeemLimiter> = Arc::new(RateLimiter::keyed(quota));
        assert!(limiter.check_key(&StudentId::new()).is_ok());
        assert_eq!(limiter.len(), 1);

        let handle = spawn_limiter_cleanup(limiter.clone(), Duration::from_millis(10));
        for _ in 0..100 {
            if limiter.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(limiter.is_empty());
        handle.abort();
    }

    #[test]
    fn test_default_cleanup_interval() {
        assert_eq!(
            RateLimitConfig::default().cleanup_interval(),
            Duration::from_secs(60)
        );
    }
}
