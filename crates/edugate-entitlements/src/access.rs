//! Effective access and the access gate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use edugate_models::codes_groups::CodesGroup;
use edugate_models::{MaterialId, SectionId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::grant::{Grant, ResolutionPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Questions,
    Videos,
    Files,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Questions => "questions",
            ContentType::Videos => "videos",
            ContentType::Files => "files",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MaterialAccess {
    #[schema(value_type = Vec<String>)]
    pub questions: BTreeSet<MaterialId>,
    #[schema(value_type = Vec<String>)]
    pub files: BTreeSet<MaterialId>,
    #[schema(value_type = Vec<String>)]
    pub videos: BTreeSet<MaterialId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SectionAccess {
    #[schema(value_type = Vec<String>)]
    pub questions: BTreeSet<SectionId>,
    #[schema(value_type = Vec<String>)]
    pub videos: BTreeSet<SectionId>,
}

/// Everything a student may access in full, derived per request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EffectiveAccess {
    pub materials: MaterialAccess,
    pub sections: SectionAccess,
}

impl EffectiveAccess {
    pub fn is_empty(&self) -> bool {
        self.materials.questions.is_empty()
            && self.materials.files.is_empty()
            && self.materials.videos.is_empty()
            && self.sections.questions.is_empty()
            && self.sections.videos.is_empty()
    }

    /// Adds `grant` to this access. Grants only ever widen access.
    pub fn merge(&mut self, grant: Grant) {
        self.materials.questions.extend(grant.material_questions);
        self.materials.files.extend(grant.material_files);
        self.materials.videos.extend(grant.material_videos);
        self.sections.questions.extend(grant.section_questions);
        self.sections.videos.extend(grant.section_videos);
    }

    /// Whether `content` in `material_id` (optionally narrowed to
    /// `section_id`) is accessible in full.
    ///
    /// A material-level grant covers every section of the material. Files are
    /// only ever granted per material.
    pub fn has_access(
        &self,
        content: ContentType,
        material_id: MaterialId,
        section_id: Option<SectionId>,
    ) -> bool {
        let (materials, sections) = match content {
            ContentType::Questions => (&self.materials.questions, &self.sections.questions),
            ContentType::Videos => (&self.materials.videos, &self.sections.videos),
            ContentType::Files => return self.materials.files.contains(&material_id),
        };

        materials.contains(&material_id) || section_id.is_some_and(|s| sections.contains(&s))
    }
}

/// Free-function form of [`EffectiveAccess::has_access`].
pub fn has_access(
    access: &EffectiveAccess,
    content: ContentType,
    material_id: MaterialId,
    section_id: Option<SectionId>,
) -> bool {
    access.has_access(content, material_id, section_id)
}

/// Unions the grants of every group still valid at `now`.
///
/// Callers pass the groups whose redeemed code is still marked used; expired
/// groups are skipped here as well, so a stale row can never widen access.
pub fn resolve<'a, I>(groups: I, now: DateTime<Utc>, policy: ResolutionPolicy) -> EffectiveAccess
where
    I: IntoIterator<Item = &'a CodesGroup>,
{
    groups
        .into_iter()
        .filter(|group| !group.is_expired_at(now))
        .fold(EffectiveAccess::default(), |mut access, group| {
            access.merge(Grant::from_group(group, policy));
            access
        })
}
