//! Row builders shared by the service tests.

use chrono::{DateTime, Duration, Utc};
use edugate_models::codes_groups::GrantSurface;
use edugate_models::{CodesGroupId, MaterialId, QuestionGroupId, SectionId, StudentId, VideoId};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert_student(pool: &PgPool) -> StudentId {
    let phone = format!("07{}", &Uuid::new_v4().simple().to_string()[..9]);
    sqlx::query_scalar::<_, StudentId>(
        "INSERT INTO students (first_name, last_name, phone) VALUES ('Test', 'Student', $1) RETURNING id",
    )
    .bind(phone)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_material(pool: &PgPool, name: &str) -> MaterialId {
    sqlx::query_scalar::<_, MaterialId>("INSERT INTO materials (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_section(pool: &PgPool, material_id: MaterialId, name: &str) -> SectionId {
    sqlx::query_scalar::<_, SectionId>(
        "INSERT INTO sections (material_id, name) VALUES ($1, $2) RETURNING id",
    )
    .bind(material_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Inserts a question group holding `questions` numbered questions.
pub async fn insert_question_group(
    pool: &PgPool,
    material_id: MaterialId,
    section_id: SectionId,
    questions: usize,
) -> QuestionGroupId {
    let questions: Vec<_> = (0..questions)
        .map(|i| {
            json!({
                "text": format!("Question {}", i + 1),
                "is_multiple_choice": true,
                "choices": [
                    { "text": "A", "is_correct": true },
                    { "text": "B", "is_correct": false }
                ]
            })
        })
        .collect();

    sqlx::query_scalar::<_, QuestionGroupId>(
        r#"INSERT INTO question_groups (material_id, section_id, paragraph, questions)
           VALUES ($1, $2, 'Read the passage', $3)
           RETURNING id"#,
    )
    .bind(material_id)
    .bind(section_id)
    .bind(serde_json::Value::Array(questions))
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_free_question_group(
    pool: &PgPool,
    material_id: MaterialId,
    section_id: SectionId,
) {
    sqlx::query(
        r#"INSERT INTO free_question_groups (material_id, section_id, questions)
           VALUES ($1, $2, '[{"text": "Curated question"}]'::jsonb)"#,
    )
    .bind(material_id)
    .bind(section_id)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_video(
    pool: &PgPool,
    material_id: MaterialId,
    section_id: SectionId,
    order_index: i32,
    is_free: bool,
) -> VideoId {
    sqlx::query_scalar::<_, VideoId>(
        r#"INSERT INTO videos (material_id, section_id, name, is_free, order_index)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id"#,
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

pub async fn insert_file(pool: &PgPool, material_id: MaterialId, num: i32) {
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

/// Stores a codes group with the given grant and unused `codes`.
pub async fn insert_codes_group(
    pool: &PgPool,
    grant: &GrantSurface,
    expiration: DateTime<Utc>,
    codes: &[&str],
) -> CodesGroupId {
    let id = sqlx::query_scalar::<_, CodesGroupId>(
        r#"INSERT INTO codes_groups (
               name, expiration,
               materials_with_questions, materials_with_files, materials_with_lectures,
               sections, sections_for_videos, sections_for_questions,
               access_videos, access_questions, access_files
           )
           VALUES ('Test batch', $1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
           RETURNING id"#,
    )
    .bind(expiration)
    .bind(&grant.materials_with_questions)
    .bind(&grant.materials_with_files)
    .bind(&grant.materials_with_lectures)
    .bind(&grant.sections)
    .bind(&grant.sections_for_videos)
    .bind(&grant.sections_for_questions)
    .bind(grant.access.videos)
    .bind(grant.access.questions)
    .bind(grant.access.files)
    .fetch_one(pool)
    .await
    .unwrap();

    for code in codes {
        sqlx::query("INSERT INTO codes (codes_group_id, value) VALUES ($1, $2)")
            .bind(id)
            .bind(*code)
            .execute(pool)
            .await
            .unwrap();
    }

    id
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
