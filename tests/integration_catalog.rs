mod common;

use axum::http::StatusCode;
use common::{
    admin_token, create_material, create_question_groups, create_section, create_student, send,
    setup_test_app, token,
};
use edugate::edugate_auth::Role;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

async fn post(app: &axum::Router, uri: &str, body: Value) -> Value {
    let (status, body) = send(app, "POST", uri, Some(&admin_token()), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_build_catalog_through_api(pool: PgPool) {
    let app = setup_test_app(pool);
    let admin = admin_token();

    let material = post(&app, "/api/admin/materials", json!({ "name": "Geography" })).await;
    let material_id = material["id"].as_str().unwrap().to_string();
    let section = post(
        &app,
        "/api/admin/sections",
        json!({ "material_id": material_id, "name": "Rivers" }),
    )
    .await;
    let section_id = section["id"].as_str().unwrap().to_string();

    let mut video_ids = Vec::new();
    for name in ["Nile", "Amazon", "Danube"] {
        let video = post(
            &app,
            "/api/admin/videos",
            json!({
                "material_id": material_id,
                "section_id": section_id,
                "name": name,
                "source": { "access_url": format!("https://video.example.com/{}", name) }
            }),
        )
        .await;
        video_ids.push(video["id"].as_str().unwrap().to_string());
    }

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/api/admin/videos?section_id={}", section_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let free: Vec<bool> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["is_free"].as_bool().unwrap())
        .collect();
    assert_eq!(free, vec![true, false, false]);

    let reversed: Vec<&String> = video_ids.iter().rev().collect();
    let (status, reordered) = send(
        &app,
        "PUT",
        "/api/admin/videos/reorder",
        Some(&admin),
        Some(json!({ "section_id": section_id, "video_ids": reversed })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = reordered
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Danube", "Amazon", "Nile"]);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/admin/videos/reorder",
        Some(&admin),
        Some(json!({ "section_id": section_id, "video_ids": [video_ids[0]] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, toggled) = send(
        &app,
        "PATCH",
        &format!("/api/admin/videos/{}/free", video_ids[1]),
        Some(&admin),
        Some(json!({ "is_free": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["is_free"], true);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/admin/materials/{}", material_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/admin/materials/{}", material_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_section_requires_existing_material(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/sections",
        Some(&admin_token()),
        Some(json!({ "material_id": uuid::Uuid::new_v4(), "name": "Orphan" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rebuild_free_pool_feeds_previews(pool: PgPool) {
    let material = common::create_material(&pool, "Geography").await;
    let section = common::create_section(&pool, material, "Mountains").await;
    create_question_groups(&pool, material, section, 4, 1).await;
    create_question_groups(&pool, material, section, 2, 4).await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, report) = send(
        &app,
        "POST",
        "/api/admin/free-questions/rebuild",
        Some(&admin_token()),
        Some(json!({ "per_section_cap": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", report);
    assert_eq!(report["total_copied"], 3);
    assert_eq!(report["sections_processed"], 1);
    assert!(report["sections"][0]["error"].is_null());

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/student/free-questions?material_id={}", material),
        Some(&token(Role::Student, student)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total_available"], 3);
    let groups = body["data"].as_array().unwrap();
    assert_eq!(groups.len(), 3);
    assert!(
        groups
            .iter()
            .all(|g| g["questions"].as_array().unwrap().len() == 1)
    );
}

async fn put(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(&admin_token()), Some(body)).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_edit_catalog_through_api(pool: PgPool) {
    let material = create_material(&pool, "Geography").await;
    let section = create_section(&pool, material, "Rivers").await;
    create_question_groups(&pool, material, section, 1, 2).await;
    let app = setup_test_app(pool);
    let admin = admin_token();

    let (status, body) = put(
        &app,
        &format!("/api/admin/materials/{}", material),
        json!({ "description": "Physical geography" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Geography");
    assert_eq!(body["description"], "Physical geography");

    let (status, body) = put(
        &app,
        &format!("/api/admin/sections/{}", section),
        json!({ "name": "Great rivers" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Great rivers");

    let video = post(
        &app,
        "/api/admin/videos",
        json!({
            "material_id": material,
            "section_id": section,
            "name": "Nile",
            "source": { "video_id": "1" }
        }),
    )
    .await;
    let (status, body) = put(
        &app,
        &format!("/api/admin/videos/{}", video["id"].as_str().unwrap()),
        json!({ "seek_points": [{ "moment": "01:10", "description": "Delta" }] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nile");
    assert_eq!(body["seek_points"][0]["moment"], "01:10");

    let file = post(
        &app,
        "/api/admin/files",
        json!({
            "material_id": material,
            "num": 1,
            "kind": "notes",
            "filename": "rivers.pdf",
            "access_url": "https://cdn.example.com/rivers.pdf"
        }),
    )
    .await;
    let (status, body) = put(
        &app,
        &format!("/api/admin/files/{}", file["id"].as_str().unwrap()),
        json!({ "kind": "golden_papers" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "golden_papers");
    assert_eq!(body["num"], 1);

    let (_, groups) = send(
        &app,
        "GET",
        &format!("/api/admin/question-groups?section_id={}", section),
        Some(&admin),
        None,
    )
    .await;
    let group_id = groups["data"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = put(
        &app,
        &format!("/api/admin/question-groups/{}", group_id),
        json!({ "paragraph": "Study the map" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paragraph"], "Study the map");

    let question_uri = |index: usize| {
        format!("/api/admin/question-groups/{}/questions/{}", group_id, index)
    };
    let (status, body) = put(&app, &question_uri(1), json!({ "text": "Longest river?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"][1]["text"], "Longest river?");

    let (status, _) = put(&app, &question_uri(5), json!({ "text": "Out of range" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = put(&app, &question_uri(0), json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, "DELETE", &question_uri(0), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let remaining = body["questions"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["text"], "Longest river?");

    let (status, _) = put(
        &app,
        &format!("/api/admin/materials/{}", Uuid::new_v4()),
        json!({ "name": "Missing" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_list_materials_and_sections(pool: PgPool) {
    let geography = create_material(&pool, "Geography").await;
    let history = create_material(&pool, "History").await;
    create_section(&pool, geography, "Rivers").await;
    create_section(&pool, geography, "Deserts").await;
    create_section(&pool, history, "Empires").await;
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);
    let student_token = token(Role::Student, student);

    let (status, body) = send(&app, "GET", "/api/student/materials", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Geography", "History"]);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/student/sections?material_id={}", geography),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sections = body.as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert!(sections.iter().all(|s| s["material_id"] == geography.to_string()));

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/student/sections?material_id={}", Uuid::new_v4()),
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/student/materials", Some(&admin_token()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
