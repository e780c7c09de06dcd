//! Codes group seeding: one full-access batch per seeded material.

use chrono::{Duration, Utc};
use edugate_entitlements::codegen::generate_unique_codes;
use sqlx::PgPool;
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

use super::models::SEED_GROUP_PREFIX;

/// Creates a codes group granting every content type of each material and
/// fills it with `codes_per_group` fresh codes. Returns the generated codes.
pub async fn seed_codes_groups(
    db: &PgPool,
    material_ids: &[Uuid],
    codes_per_group: usize,
    validity_days: i64,
) -> anyhow::Result<Vec<String>> {
    let start_time = Instant::now();
    println!("🎟️  Seeding codes for {} materials...", material_ids.len());

    let expiration = Utc::now() + Duration::days(validity_days);
    let mut all_codes = Vec::with_capacity(material_ids.len() * codes_per_group);
    let mut tx = db.begin().await?;

    for (idx, material_id) in material_ids.iter().enumerate() {
        let group_id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO codes_groups (
                   name, expiration,
                   materials_with_questions, materials_with_files, materials_with_lectures,
                   access_videos, access_questions, access_files
               )
               VALUES ($1, $2, $3, $3, $3, TRUE, TRUE, TRUE)
               RETURNING id"#,
        )
        .bind(format!("{} {}", SEED_GROUP_PREFIX, idx + 1))
        .bind(expiration)
        .bind(vec![*material_id])
        .fetch_one(&mut *tx)
        .await?;

        let taken: HashSet<String> = all_codes.iter().cloned().collect();
        let codes = {
            let mut rng = rand::thread_rng();
            generate_unique_codes(&mut rng, codes_per_group, &taken)
        };

        let inserted = sqlx::query_scalar::<_, String>(
            r#"INSERT INTO codes (codes_group_id, value)
               SELECT $1, v FROM UNNEST($2::text[]) AS t(v)
               ON CONFLICT (value) DO NOTHING
               RETURNING value"#,
        )
        .bind(group_id)
        .bind(&codes)
        .fetch_all(&mut *tx)
        .await?;

        all_codes.extend(inserted);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} codes in {:?}",
        all_codes.len(),
        start_time.elapsed()
    );

    Ok(all_codes)
}

/// Deletes seeded codes groups; codes and redemptions cascade.
pub async fn clear_codes_groups(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM codes_groups WHERE name LIKE $1 || '%'")
        .bind(SEED_GROUP_PREFIX)
        .execute(db)
        .await?
        .rows_affected();

    println!("   ✓ Deleted {} codes groups", result);
    Ok(result)
}
