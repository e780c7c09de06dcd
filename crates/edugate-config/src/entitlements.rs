//! Entitlement engine configuration.
//!
//! - `FREE_SAMPLE_CAP`: items returned by a fallback preview (default: 5)
//! - `EXAM_QUESTION_CAP`: questions drawn for a material exam (default: 40)
//! - `FREE_POOL_SECTION_CAP`: groups copied per section when the curated free
//!   pool is rebuilt (default: 5)
//! - `ENTITLEMENT_FILES_GRANT_VIDEOS`: when `true`, a material-level files
//!   grant also unlocks that material's videos for groups that carry no
//!   video section grant (default: false)

use crate::env_or;

/// Upper bound for any caller-supplied sample cap.
pub const MAX_SAMPLE_CAP: i64 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitlementConfig {
    pub free_sample_cap: i64,
    pub exam_question_cap: i64,
    pub free_pool_section_cap: i64,
    pub files_grant_videos: bool,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            free_sample_cap: 5,
            exam_question_cap: 40,
            free_pool_section_cap: 5,
            files_grant_videos: false,
        }
    }
}

impl EntitlementConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            free_sample_cap: env_or("FREE_SAMPLE_CAP", defaults.free_sample_cap)
                .clamp(1, MAX_SAMPLE_CAP),
            exam_question_cap: env_or("EXAM_QUESTION_CAP", defaults.exam_question_cap).max(1),
            free_pool_section_cap: env_or("FREE_POOL_SECTION_CAP", defaults.free_pool_section_cap)
                .clamp(1, MAX_SAMPLE_CAP),
            files_grant_videos: env_or(
                "ENTITLEMENT_FILES_GRANT_VIDEOS",
                defaults.files_grant_videos,
            ),
        }
    }

    /// Resolves a requested cap against the configured default, clamped to
    /// `1..=MAX_SAMPLE_CAP`.
    #[must_use]
    pub fn sample_cap(&self, requested: Option<i64>) -> usize {
        requested
            .unwrap_or(self.free_sample_cap)
            .clamp(1, MAX_SAMPLE_CAP) as usize
    }

    #[must_use]
    pub fn exam_cap(&self) -> usize {
        self.exam_question_cap.max(1) as usize
    }
}
