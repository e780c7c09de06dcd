mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{create_student, redeem, setup_test_app_with_state, token};
use edugate::edugate_auth::Role;
use edugate::edugate_config::{CorsConfig, EntitlementConfig, JwtConfig, RateLimitConfig};
use edugate::edugate_entitlements::SeededSampler;
use edugate::state::AppState;
use sqlx::PgPool;

fn strict_state(pool: PgPool) -> AppState {
    AppState::new(
        pool,
        JwtConfig {
            secret: "test-secret-key".to_string(),
            access_token_expiry: 3600,
        },
        CorsConfig::parse("*"),
        RateLimitConfig {
            redeem_per_minute: 1,
            redeem_burst_size: 1,
            ..Default::default()
        },
        EntitlementConfig::default(),
        Arc::new(SeededSampler::new(7)),
    )
}

#[sqlx::test(migrations = "./migrations")]
async fn test_redeem_attempts_are_limited_per_student(pool: PgPool) {
    let first = create_student(&pool).await;
    let second = create_student(&pool).await;
    let app = setup_test_app_with_state(strict_state(pool));
    let first_token = token(Role::Student, first);

    let (status, _) = redeem(&app, &first_token, "UNKNOWN1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = redeem(&app, &first_token, "UNKNOWN2").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Too many"));

    // Another student has their own budget
    let (status, _) = redeem(&app, &token(Role::Student, second), "UNKNOWN3").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reads_are_not_limited(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app_with_state(strict_state(pool));
    let student_token = token(Role::Student, student);

    for _ in 0..3 {
        let (status, _) =
            common::send(&app, "GET", "/api/student/access", Some(&student_token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
