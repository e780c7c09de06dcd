//! Free previews served when a student lacks access.
//!
//! A preview is never padded and never errors on scarcity: it holds exactly
//! `min(cap, eligible)` items.

use std::cmp::Ordering;

use edugate_models::catalog::{Question, QuestionGroup, Video};
use serde::Serialize;

use crate::sampler::{Sampler, sample};

/// Where preview content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackSource {
    /// Curated free question pool, returned in stored order
    CuratedPool,
    /// Uniform sample of the real question groups
    UniformSample,
    /// Videos flagged free
    FreeVideos,
}

impl FallbackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackSource::CuratedPool => "curated_pool",
            FallbackSource::UniformSample => "uniform_sample",
            FallbackSource::FreeVideos => "free_videos",
        }
    }
}

/// Picks preview items: the curated pool in order when it has anything for
/// the scope, otherwise a uniform sample of `eligible`.
pub fn select_free<T: Clone>(
    curated: Vec<T>,
    eligible: &[T],
    cap: usize,
    sampler: &dyn Sampler,
) -> (FallbackSource, Vec<T>) {
    if curated.is_empty() {
        (FallbackSource::UniformSample, sample(sampler, eligible, cap))
    } else {
        (
            FallbackSource::CuratedPool,
            curated.into_iter().take(cap).collect(),
        )
    }
}

/// Preview ordering for videos: `order_index` ascending, newest first on ties.
pub fn video_order(a: &Video, b: &Video) -> Ordering {
    a.order_index
        .cmp(&b.order_index)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Free videos of `videos`, in preview order, at most `cap`.
pub fn select_free_videos(videos: Vec<Video>, cap: usize) -> Vec<Video> {
    let mut free: Vec<Video> = videos.into_iter().filter(|v| v.is_free).collect();
    free.sort_by(video_order);
    free.truncate(cap);
    free
}

/// Groups eligible for the curated pool: exactly one question each.
pub fn is_single_question(group: &QuestionGroup) -> bool {
    group.questions.0.len() == 1
}

/// Exam draw: up to `cap` questions chosen uniformly from `questions`.
pub fn sample_exam(questions: &[Question], cap: usize, sampler: &dyn Sampler) -> Vec<Question> {
    sample(sampler, questions, cap)
}

/// Flattens groups into their questions, keeping group order.
pub fn flatten_questions<I, G>(groups: I) -> Vec<Question>
where
    I: IntoIterator<Item = G>,
    G: Into<Vec<Question>>,
{
    groups
        .into_iter()
        .flat_map(|group| -> Vec<Question> { group.into() })
        .collect()
}
