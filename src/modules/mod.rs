pub mod access;
pub mod catalog;
pub mod codes_groups;
pub mod content;
pub mod free_questions;
pub mod redemptions;
pub mod students;
