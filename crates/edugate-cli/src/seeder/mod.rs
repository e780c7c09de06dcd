//! Database seeding for development and load testing.
//!
//! Seeded rows are tagged (material description, student phone prefix,
//! codes group name prefix) so `clear_all` removes only what was seeded.

pub mod catalog;
pub mod codes;
pub mod models;
pub mod students;

pub use models::{CatalogShape, SeedConfig};

use sqlx::PgPool;
use std::time::Instant;

/// Seeds the catalog, students and one codes group per material.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🌱 Starting database seed...\n");

    let material_ids = catalog::seed_catalog(db, config.num_materials, &config.catalog).await?;
    students::seed_students(db, config.num_students).await?;
    let codes = codes::seed_codes_groups(
        db,
        &material_ids,
        config.codes_per_material,
        config.code_validity_days,
    )
    .await?;

    println!("\n✅ Seed complete in {:?}", start_time.elapsed());
    println!("   Materials: {}", material_ids.len());
    println!("   Videos: {}", config.total_videos());
    if let Some(sample) = codes.first() {
        println!("   Sample code: {}", sample);
    }

    Ok(())
}

/// Removes everything `seed_all` created.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...\n");

    codes::clear_codes_groups(db).await?;
    students::clear_students(db).await?;
    catalog::clear_catalog(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
