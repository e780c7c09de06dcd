#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use edugate::edugate_auth::{Role, create_access_token};
use edugate::router::init_router;
use edugate::state::{AppState, test_app_state};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_app_state(pool))
}

pub fn setup_test_app_with_state(state: AppState) -> Router {
    init_router(state)
}

/// Signs a token the test state accepts.
pub fn token(role: Role, subject: Uuid) -> String {
    let state_config = edugate::edugate_config::JwtConfig {
        secret: "test-secret-key".to_string(),
        access_token_expiry: 3600,
    };
    create_access_token(subject, role, &state_config).unwrap()
}

pub fn admin_token() -> String {
    token(Role::Admin, Uuid::new_v4())
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// Sends a request and returns the status with the JSON body (`Null` when
/// the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn create_student(pool: &PgPool) -> Uuid {
    let phone = format!("07{}", &Uuid::new_v4().simple().to_string()[..9]);
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO students (first_name, last_name, phone) VALUES ('Test', 'Student', $1) RETURNING id",
    )
    .bind(phone)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_material(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO materials (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_section(pool: &PgPool, material_id: Uuid, name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO sections (material_id, name) VALUES ($1, $2) RETURNING id",
    )
    .bind(material_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts `count` question groups of `questions_each` questions.
pub async fn create_question_groups(
    pool: &PgPool,
    material_id: Uuid,
    section_id: Uuid,
    count: usize,
    questions_each: usize,
) {
    let questions: Vec<Value> = (0..questions_each)
        .map(|i| json!({ "text": format!("Question {}", i + 1) }))
        .collect();
    for _ in 0..count {
        sqlx::query(
            "INSERT INTO question_groups (material_id, section_id, questions) VALUES ($1, $2, $3)",
        )
        .bind(material_id)
        .bind(section_id)
        .bind(Value::Array(questions.clone()))
        .execute(pool)
        .await
        .unwrap();
    }
}

pub async fn create_video(
    pool: &PgPool,
    material_id: Uuid,
    section_id: Uuid,
    order_index: i32,
    is_free: bool,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO videos (material_id, section_id, name, is_free, order_index)
           VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
    )
    .bind(material_id)
    .bind(section_id)
    .bind(format!("Lecture {}", order_index))
    .bind(is_free)
    .bind(order_index)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_file(pool: &PgPool, material_id: Uuid, num: i32) {
    sqlx::query(
        r#"INSERT INTO files (material_id, num, kind, filename, access_url)
           VALUES ($1, $2, 'notes', $3, $4)"#,
    )
    .bind(material_id)
    .bind(num)
    .bind(format!("notes-{}.pdf", num))
    .bind(format!("https://cdn.example.com/notes-{}.pdf", num))
    .execute(pool)
    .await
    .unwrap();
}

/// Provisions a batch through the admin API and returns its response body.
pub async fn generate_codes(app: &Router, body: Value) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/admin/codes-groups",
        Some(&admin_token()),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

pub async fn redeem(app: &Router, student_token: &str, code: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/student/redemptions",
        Some(student_token),
        Some(json!({ "code": code })),
    )
    .await
}

/// Backdates a codes group so it is already expired.
pub async fn expire_codes_group(pool: &PgPool, codes_group_id: &str) {
    sqlx::query("UPDATE codes_groups SET expiration = NOW() - INTERVAL '1 day' WHERE id = $1::uuid")
        .bind(codes_group_id)
        .execute(pool)
        .await
        .unwrap();
}
