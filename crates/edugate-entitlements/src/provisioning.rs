//! Maps a code provisioning request onto the grant surface it stores.
//!
//! New batches only write the per-type fields: single-section modes use
//! `sections_for_videos` / `sections_for_questions` with their access flag,
//! never the legacy `sections` list, which would grant both content types.

use edugate_models::codes_groups::{GenerateCodesDto, GenerationMode, GrantSurface};
use edugate_models::{MaterialId, SectionId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantPlanError {
    #[error("section_id is required for mode {0:?}")]
    MissingSection(GenerationMode),
    #[error("material_id is required for mode {0:?}")]
    MissingMaterial(GenerationMode),
    #[error("Request grants no content: provide a mode or at least one grant list")]
    NoGrant,
}

/// A grant surface plus the catalog ids that must exist before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantPlan {
    pub surface: GrantSurface,
    pub sections: Vec<SectionId>,
    pub materials: Vec<MaterialId>,
    /// Composite requests report unknown ids as invalid input; single-target
    /// requests report them as not found.
    pub composite: bool,
}

pub fn plan_grant(dto: &GenerateCodesDto) -> Result<GrantPlan, GrantPlanError> {
    if dto.is_composite() {
        return Ok(plan_composite(dto));
    }

    let mode = dto.mode.ok_or(GrantPlanError::NoGrant)?;
    let mut surface = GrantSurface::default();
    let mut sections = Vec::new();
    let mut materials = Vec::new();

    match mode {
        GenerationMode::SectionVideos => {
            let section = dto.section_id.ok_or(GrantPlanError::MissingSection(mode))?;
            surface.sections_for_videos = vec![section];
            surface.access.videos = true;
            sections.push(section);
        }
        GenerationMode::SectionQuestions => {
            let section = dto.section_id.ok_or(GrantPlanError::MissingSection(mode))?;
            surface.sections_for_questions = vec![section];
            surface.access.questions = true;
            sections.push(section);
        }
        GenerationMode::MaterialFiles => {
            let material = dto.material_id.ok_or(GrantPlanError::MissingMaterial(mode))?;
            surface.materials_with_files = vec![material];
            surface.access.files = true;
            materials.push(material);
        }
        GenerationMode::MaterialAll => {
            let material = dto.material_id.ok_or(GrantPlanError::MissingMaterial(mode))?;
            surface.materials_with_files = vec![material];
            surface.materials_with_questions = vec![material];
            surface.materials_with_lectures = vec![material];
            surface.access.files = true;
            surface.access.questions = true;
            surface.access.videos = true;
            materials.push(material);
        }
    }

    Ok(GrantPlan {
        surface,
        sections,
        materials,
        composite: false,
    })
}

fn plan_composite(dto: &GenerateCodesDto) -> GrantPlan {
    let mut surface = GrantSurface::default();

    if !dto.sections_for_videos.is_empty() {
        surface.sections_for_videos = dedup(&dto.sections_for_videos);
        surface.access.videos = true;
    }
    if !dto.sections_for_questions.is_empty() {
        surface.sections_for_questions = dedup(&dto.sections_for_questions);
        surface.access.questions = true;
    }
    if !dto.materials_for_files.is_empty() {
        surface.materials_with_files = dedup(&dto.materials_for_files);
        surface.access.files = true;
    }
    if !dto.materials_for_all.is_empty() {
        let all = &dto.materials_for_all;
        surface.materials_with_files = dedup_chain(&surface.materials_with_files, all);
        surface.materials_with_questions = dedup(all);
        surface.materials_with_lectures = dedup(all);
        surface.access.files = true;
        surface.access.questions = true;
        surface.access.videos = true;
    }

    let sections = dedup_chain(&surface.sections_for_videos, &surface.sections_for_questions);
    let materials = dedup_chain(&dto.materials_for_files, &dto.materials_for_all);

    GrantPlan {
        surface,
        sections,
        materials,
        composite: true,
    }
}

/// Removes duplicates, keeping first occurrences in order.
fn dedup<T: Copy + Ord>(items: &[T]) -> Vec<T> {
    dedup_chain(items, &[])
}

fn dedup_chain<T: Copy + Ord>(first: &[T], second: &[T]) -> Vec<T> {
    let mut seen = std::collections::BTreeSet::new();
    first
        .iter()
        .chain(second)
        .copied()
        .filter(|item| seen.insert(*item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn request() -> GenerateCodesDto {
        GenerateCodesDto {
            name: None,
            code_count: 10,
            expiration: Utc::now() + Duration::days(30),
            mode: None,
            material_id: None,
            section_id: None,
            sections_for_videos: vec![],
            sections_for_questions: vec![],
            materials_for_files: vec![],
            materials_for_all: vec![],
        }
    }

    #[test]
    fn test_no_mode_no_arrays_is_rejected() {
        assert_eq!(plan_grant(&request()), Err(GrantPlanError::NoGrant));
    }

    #[test]
    fn test_section_questions_mode_uses_typed_field() {
        let s = SectionId::new();
        let plan = plan_grant(&GenerateCodesDto {
            mode: Some(GenerationMode::SectionQuestions),
            section_id: Some(s),
            ..request()
        })
        .unwrap();

        assert_eq!(plan.surface.sections_for_questions, vec![s]);
        assert!(plan.surface.sections.is_empty());
        assert!(plan.surface.access.questions);
        assert!(!plan.surface.access.videos);
        assert_eq!(plan.sections, vec![s]);
        assert!(!plan.composite);
    }

    #[test]
    fn test_mode_requires_target() {
        let err = plan_grant(&GenerateCodesDto {
            mode: Some(GenerationMode::SectionVideos),
            ..request()
        })
        .unwrap_err();
        assert_eq!(err, GrantPlanError::MissingSection(GenerationMode::SectionVideos));

        let err = plan_grant(&GenerateCodesDto {
            mode: Some(GenerationMode::MaterialFiles),
            section_id: Some(SectionId::new()),
            ..request()
        })
        .unwrap_err();
        assert_eq!(err, GrantPlanError::MissingMaterial(GenerationMode::MaterialFiles));
    }

    #[test]
    fn test_material_all_mode() {
        let m = MaterialId::new();
        let plan = plan_grant(&GenerateCodesDto {
            mode: Some(GenerationMode::MaterialAll),
            material_id: Some(m),
            ..request()
        })
        .unwrap();

        assert_eq!(plan.surface.materials_with_questions, vec![m]);
        assert_eq!(plan.surface.materials_with_files, vec![m]);
        assert_eq!(plan.surface.materials_with_lectures, vec![m]);
        assert!(plan.surface.access.videos && plan.surface.access.questions && plan.surface.access.files);
    }

    #[test]
    fn test_composite_overrides_mode_and_merges() {
        let (m1, m2) = (MaterialId::new(), MaterialId::new());
        let (s1, s2) = (SectionId::new(), SectionId::new());
        let plan = plan_grant(&GenerateCodesDto {
            mode: Some(GenerationMode::SectionVideos),
            section_id: Some(SectionId::new()),
            sections_for_videos: vec![s1, s1],
            sections_for_questions: vec![s2, s1],
            materials_for_files: vec![m1],
            materials_for_all: vec![m1, m2],
            ..request()
        })
        .unwrap();

        assert!(plan.composite);
        assert_eq!(plan.surface.sections_for_videos, vec![s1]);
        assert_eq!(plan.surface.sections_for_questions, vec![s2, s1]);
        assert_eq!(plan.surface.materials_with_files, vec![m1, m2]);
        assert_eq!(plan.surface.materials_with_questions, vec![m1, m2]);
        assert_eq!(plan.sections, vec![s1, s2]);
        assert_eq!(plan.materials, vec![m1, m2]);
    }
}
