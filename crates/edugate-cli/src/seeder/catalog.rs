//! Catalog seeding: materials, sections, videos, question groups and files.

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use rayon::prelude::*;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{
    CatalogShape, FileSeed, MaterialSeed, QuestionGroupSeed, SEED_MATERIAL_MARKER, SectionSeed,
    VideoSeed,
};

const FILE_KINDS: [&str; 3] = ["golden_papers", "notes", "ministerial_exam"];

/// Generates catalog data in parallel using Rayon
pub fn generate_materials(count: usize, shape: &CatalogShape) -> Vec<MaterialSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let subject: String = Word().fake();
            let sections = (0..shape.sections_per_material)
                .map(|s| generate_section(s, shape))
                .collect();
            let files = (0..shape.files_per_material)
                .map(|f| generate_file(idx, f))
                .collect();

            MaterialSeed {
                id: Uuid::new_v4(),
                name: format!("{} {}", capitalize(&subject), idx + 1),
                sections,
                files,
            }
        })
        .collect()
}

fn generate_section(idx: usize, shape: &CatalogShape) -> SectionSeed {
    let words: Vec<String> = Words(2..4).fake();
    let videos = (0..shape.videos_per_section)
        .map(|v| {
            let title: String = Sentence(2..5).fake();
            VideoSeed {
                name: title.trim_end_matches('.').to_string(),
                source: json!({
                    "access_url": format!("https://video.example.com/embed/{}", Uuid::new_v4()),
                    "video_id": Uuid::new_v4().to_string(),
                }),
                is_free: v == 0,
                order_index: v as i32 + 1,
            }
        })
        .collect();

    // Alternate single-question groups (free pool candidates) with passages.
    let question_groups = (0..shape.question_groups_per_section)
        .map(|g| {
            let count = if g % 2 == 0 { 1 } else { 3 };
            QuestionGroupSeed {
                paragraph: (count > 1).then(|| Paragraph(2..4).fake::<String>()),
                questions: generate_questions(count),
            }
        })
        .collect();

    SectionSeed {
        id: Uuid::new_v4(),
        name: format!("{}. {}", idx + 1, capitalize(&words.join(" "))),
        videos,
        question_groups,
    }
}

fn generate_questions(count: usize) -> serde_json::Value {
    let questions: Vec<_> = (0..count)
        .map(|_| {
            let text: String = Sentence(4..10).fake();
            let choices: Vec<_> = (0..4)
                .map(|c| {
                    let choice: String = Sentence(1..4).fake();
                    json!({ "text": choice, "is_correct": c == 0 })
                })
                .collect();
            json!({
                "text": text.replace('.', "?"),
                "is_multiple_choice": true,
                "choices": choices,
            })
        })
        .collect();
    serde_json::Value::Array(questions)
}

fn generate_file(material_idx: usize, idx: usize) -> FileSeed {
    let kind = FILE_KINDS[idx % FILE_KINDS.len()];
    let filename = format!("{}-{}-{}.pdf", kind, material_idx + 1, idx + 1);
    FileSeed {
        num: idx as i32 + 1,
        kind,
        access_url: format!("https://cdn.example.com/files/{}", filename),
        filename,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Seeds materials with their sections and content. Returns material ids.
pub async fn seed_catalog(
    db: &PgPool,
    count: usize,
    shape: &CatalogShape,
) -> anyhow::Result<Vec<Uuid>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} materials...", count);

    let materials = generate_materials(count, shape);

    let mut tx = db.begin().await?;
    insert_materials(&mut tx, &materials).await?;
    insert_sections(&mut tx, &materials).await?;
    insert_videos(&mut tx, &materials).await?;
    insert_question_groups(&mut tx, &materials).await?;
    insert_files(&mut tx, &materials).await?;
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} materials in {:?}",
        materials.len(),
        start_time.elapsed()
    );

    Ok(materials.iter().map(|m| m.id).collect())
}

async fn insert_materials(
    tx: &mut Transaction<'_, Postgres>,
    materials: &[MaterialSeed],
) -> anyhow::Result<()> {
    let ids: Vec<Uuid> = materials.iter().map(|m| m.id).collect();
    let names: Vec<String> = materials.iter().map(|m| m.name.clone()).collect();

    sqlx::query(
        r#"INSERT INTO materials (id, name, description)
           SELECT id, name, $3 FROM UNNEST($1::uuid[], $2::text[]) AS t(id, name)"#,
    )
    .bind(&ids)
    .bind(&names)
    .bind(SEED_MATERIAL_MARKER)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_sections(
    tx: &mut Transaction<'_, Postgres>,
    materials: &[MaterialSeed],
) -> anyhow::Result<()> {
    let mut ids = Vec::new();
    let mut material_ids = Vec::new();
    let mut names = Vec::new();
    for material in materials {
        for section in &material.sections {
            ids.push(section.id);
            material_ids.push(material.id);
            names.push(section.name.clone());
        }
    }

    sqlx::query(
        r#"INSERT INTO sections (id, material_id, name)
           SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[])"#,
    )
    .bind(&ids)
    .bind(&material_ids)
    .bind(&names)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_videos(
    tx: &mut Transaction<'_, Postgres>,
    materials: &[MaterialSeed],
) -> anyhow::Result<()> {
    let mut material_ids = Vec::new();
    let mut section_ids = Vec::new();
    let mut names = Vec::new();
    let mut sources = Vec::new();
    let mut free = Vec::new();
    let mut orders = Vec::new();
    for material in materials {
        for section in &material.sections {
            for video in &section.videos {
                material_ids.push(material.id);
                section_ids.push(section.id);
                names.push(video.name.clone());
                sources.push(video.source.clone());
                free.push(video.is_free);
                orders.push(video.order_index);
            }
        }
    }

    sqlx::query(
        r#"INSERT INTO videos (material_id, section_id, name, source, is_free, order_index)
           SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::jsonb[], $5::bool[], $6::int[])"#,
    )
    .bind(&material_ids)
    .bind(&section_ids)
    .bind(&names)
    .bind(&sources)
    .bind(&free)
    .bind(&orders)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_question_groups(
    tx: &mut Transaction<'_, Postgres>,
    materials: &[MaterialSeed],
) -> anyhow::Result<()> {
    let mut material_ids = Vec::new();
    let mut section_ids = Vec::new();
    let mut paragraphs: Vec<Option<String>> = Vec::new();
    let mut questions = Vec::new();
    for material in materials {
        for section in &material.sections {
            for group in &section.question_groups {
                material_ids.push(material.id);
                section_ids.push(section.id);
                paragraphs.push(group.paragraph.clone());
                questions.push(group.questions.clone());
            }
        }
    }

    sqlx::query(
        r#"INSERT INTO question_groups (material_id, section_id, paragraph, questions)
           SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::text[], $4::jsonb[])"#,
    )
    .bind(&material_ids)
    .bind(&section_ids)
    .bind(&paragraphs)
    .bind(&questions)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_files(
    tx: &mut Transaction<'_, Postgres>,
    materials: &[MaterialSeed],
) -> anyhow::Result<()> {
    let mut material_ids = Vec::new();
    let mut nums = Vec::new();
    let mut kinds = Vec::new();
    let mut filenames = Vec::new();
    let mut urls = Vec::new();
    for material in materials {
        for file in &material.files {
            material_ids.push(material.id);
            nums.push(file.num);
            kinds.push(file.kind.to_string());
            filenames.push(file.filename.clone());
            urls.push(file.access_url.clone());
        }
    }

    sqlx::query(
        r#"INSERT INTO files (material_id, num, kind, filename, access_url)
           SELECT m, n, k::file_kind, f, u
           FROM UNNEST($1::uuid[], $2::int[], $3::text[], $4::text[], $5::text[]) AS t(m, n, k, f, u)"#,
    )
    .bind(&material_ids)
    .bind(&nums)
    .bind(&kinds)
    .bind(&filenames)
    .bind(&urls)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Deletes seeded materials; sections, content and free pool rows cascade.
pub async fn clear_catalog(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded materials...");

    let result = sqlx::query("DELETE FROM materials WHERE description = $1")
        .bind(SEED_MATERIAL_MARKER)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} materials in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
