mod common;

use axum::http::StatusCode;
use common::{
    create_material, create_question_groups, create_section, create_student, expire_codes_group,
    generate_codes, in_days, redeem, send, setup_test_app, token,
};
use edugate::edugate_auth::Role;
use serde_json::{Value, json};
use sqlx::PgPool;

fn codes(body: &Value) -> Vec<String> {
    body["sample"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_section_grant_unlocks_only_that_section(pool: PgPool) {
    let material = create_material(&pool, "Biology").await;
    let s1 = create_section(&pool, material, "Cells").await;
    let s2 = create_section(&pool, material, "Genetics").await;
    create_question_groups(&pool, material, s1, 8, 2).await;
    create_question_groups(&pool, material, s2, 12, 2).await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);
    let student_token = token(Role::Student, student);

    let batch = generate_codes(
        &app,
        json!({
            "code_count": 3,
            "expiration": in_days(1),
            "mode": "section_questions",
            "section_id": s1
        }),
    )
    .await;
    let code = codes(&batch)[0].clone();

    let (status, body) = redeem(&app, &student_token, &code).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["success"], true);

    let (status, access) = send(&app, "GET", "/api/student/access", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let granted: Vec<String> = access["sections"]["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(granted, vec![s1.to_string()]);

    let (status, full) = send(
        &app,
        "GET",
        &format!("/api/student/questions?material_id={}&section_id={}", material, s1),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["full_access"], true);
    assert_eq!(full["data"].as_array().unwrap().len(), 8);

    let (status, preview) = send(
        &app,
        "GET",
        &format!("/api/student/questions?material_id={}&section_id={}", material, s2),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["full_access"], false);
    assert_eq!(preview["data"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_group_grants_nothing(pool: PgPool) {
    let material = create_material(&pool, "Biology").await;
    let s1 = create_section(&pool, material, "Cells").await;
    create_question_groups(&pool, material, s1, 8, 2).await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool.clone());
    let student_token = token(Role::Student, student);

    let batch = generate_codes(
        &app,
        json!({
            "code_count": 1,
            "expiration": in_days(1),
            "mode": "section_questions",
            "section_id": s1
        }),
    )
    .await;
    let (status, _) = redeem(&app, &student_token, &codes(&batch)[0]).await;
    assert_eq!(status, StatusCode::CREATED);

    expire_codes_group(&pool, batch["codes_group_id"].as_str().unwrap()).await;

    let (_, access) = send(&app, "GET", "/api/student/access", Some(&student_token), None).await;
    assert!(access["sections"]["questions"].as_array().unwrap().is_empty());

    let (_, questions) = send(
        &app,
        "GET",
        &format!("/api/student/questions?material_id={}&section_id={}", material, s1),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(questions["full_access"], false);
    assert_eq!(questions["data"].as_array().unwrap().len(), 5);

    let (_, history) = send(&app, "GET", "/api/student/redemptions", Some(&student_token), None).await;
    assert_eq!(history["data"][0]["is_active"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_redeem_failures(pool: PgPool) {
    let material = create_material(&pool, "Biology").await;
    let first = create_student(&pool).await;
    let second = create_student(&pool).await;
    let app = setup_test_app(pool.clone());
    let first_token = token(Role::Student, first);
    let second_token = token(Role::Student, second);

    let batch = generate_codes(
        &app,
        json!({
            "code_count": 2,
            "expiration": in_days(10),
            "mode": "material_files",
            "material_id": material
        }),
    )
    .await;
    let batch_codes = codes(&batch);

    let (status, _) = redeem(&app, &first_token, "NOSUCHCODE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = redeem(&app, &first_token, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = redeem(&app, &first_token, &batch_codes[0]).await;
    assert_eq!(status, StatusCode::CREATED);

    // Used code
    let (status, _) = redeem(&app, &second_token, &batch_codes[0]).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Second code of a group the student already holds; the code stays unused.
    let (status, _) = redeem(&app, &first_token, &batch_codes[1]).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = redeem(&app, &second_token, &batch_codes[1]).await;
    assert_eq!(status, StatusCode::CREATED);

    let expired = generate_codes(
        &app,
        json!({
            "code_count": 1,
            "expiration": in_days(1),
            "mode": "material_files",
            "material_id": material
        }),
    )
    .await;
    expire_codes_group(&pool, expired["codes_group_id"].as_str().unwrap()).await;
    let (status, _) = redeem(&app, &first_token, &codes(&expired)[0]).await;
    assert_eq!(status, StatusCode::GONE);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_redemptions_of_one_code(pool: PgPool) {
    let material = create_material(&pool, "Biology").await;
    let mut students = Vec::new();
    for _ in 0..6 {
        students.push(create_student(&pool).await);
    }
    let app = setup_test_app(pool.clone());

    let batch = generate_codes(
        &app,
        json!({
            "code_count": 1,
            "expiration": in_days(10),
            "mode": "material_all",
            "material_id": material
        }),
    )
    .await;
    let code = codes(&batch)[0].clone();

    let attempts = students.iter().map(|student| {
        let app = app.clone();
        let code = code.clone();
        let student_token = token(Role::Student, *student);
        async move { redeem(&app, &student_token, &code).await.0 }
    });
    let statuses = futures::future::join_all(attempts).await;

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    assert_eq!(created, 1);
    assert!(
        statuses
            .iter()
            .all(|s| *s == StatusCode::CREATED || *s == StatusCode::CONFLICT)
    );

    let ledger = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM redemptions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(ledger, 1);
}
