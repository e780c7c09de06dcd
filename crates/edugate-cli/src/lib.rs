//! # Edugate CLI
//!
//! Database seeding utilities for edugate testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use edugate_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(3); // 3 materials with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
