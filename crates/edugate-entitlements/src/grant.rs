//! Grant normalization.
//!
//! Codes groups were issued under two schemes: whole-material grants
//! (`materials_with_*`) and, later, per-type section grants gated by access
//! flags. A legacy `sections` list predates the per-type lists and grants
//! both videos and questions. [`Grant::from_group`] folds all of them into
//! one shape so resolution never looks at field vintage.

use std::collections::BTreeSet;

use edugate_models::codes_groups::CodesGroup;
use edugate_models::{MaterialId, SectionId};

/// Optional resolution behaviors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionPolicy {
    /// Treat a material-level files grant as a video grant for that material,
    /// for groups that carry no `sections_for_videos`.
    pub files_grant_videos: bool,
}

/// Canonical access granted by one codes group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    pub material_questions: BTreeSet<MaterialId>,
    pub material_files: BTreeSet<MaterialId>,
    pub material_videos: BTreeSet<MaterialId>,
    pub section_questions: BTreeSet<SectionId>,
    pub section_videos: BTreeSet<SectionId>,
}

impl Grant {
    pub fn from_group(group: &CodesGroup, policy: ResolutionPolicy) -> Self {
        let mut grant = Grant {
            material_questions: group.materials_with_questions.iter().copied().collect(),
            material_files: group.materials_with_files.iter().copied().collect(),
            material_videos: group.materials_with_lectures.iter().copied().collect(),
            ..Grant::default()
        };

        if policy.files_grant_videos && group.sections_for_videos.is_empty() {
            grant
                .material_videos
                .extend(group.materials_with_files.iter().copied());
        }

        // Legacy sections ignore the access flags.
        grant.section_questions.extend(group.sections.iter().copied());
        grant.section_videos.extend(group.sections.iter().copied());

        if group.access_questions {
            grant
                .section_questions
                .extend(group.sections_for_questions.iter().copied());
        }
        if group.access_videos {
            grant
                .section_videos
                .extend(group.sections_for_videos.iter().copied());
        }

        grant
    }

    pub fn is_empty(&self) -> bool {
        self.material_questions.is_empty()
            && self.material_files.is_empty()
            && self.material_videos.is_empty()
            && self.section_questions.is_empty()
            && self.section_videos.is_empty()
    }
}
