//! Student seeding functionality.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{SEED_PHONE_PREFIX, StudentSeed};

/// Generates student data in parallel using Rayon
pub fn generate_students(count: usize) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|_| StudentSeed {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            phone: format!(
                "{}{:07}",
                SEED_PHONE_PREFIX,
                rand::thread_rng().gen_range(0..10_000_000)
            ),
        })
        .collect()
}

/// Seeds students; phone collisions are skipped. Returns the inserted count.
pub async fn seed_students(db: &PgPool, count: usize) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} students...", count);

    let students = generate_students(count);
    let first_names: Vec<String> = students.iter().map(|s| s.first_name.clone()).collect();
    let last_names: Vec<String> = students.iter().map(|s| s.last_name.clone()).collect();
    let phones: Vec<String> = students.iter().map(|s| s.phone.clone()).collect();

    let inserted = sqlx::query(
        r#"INSERT INTO students (first_name, last_name, phone)
           SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[])
           ON CONFLICT (phone) DO NOTHING"#,
    )
    .bind(&first_names)
    .bind(&last_names)
    .bind(&phones)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Inserted {} students in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

/// Deletes seeded students; their redemptions cascade.
pub async fn clear_students(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded students...");

    let result = sqlx::query("DELETE FROM students WHERE phone LIKE $1 || '%'")
        .bind(SEED_PHONE_PREFIX)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} students in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_phones_carry_seed_prefix() {
        let students = generate_students(20);
        assert_eq!(students.len(), 20);
        assert!(students.iter().all(|s| s.phone.starts_with(SEED_PHONE_PREFIX)));
        assert!(students.iter().all(|s| s.phone.len() == 11));
    }
}
