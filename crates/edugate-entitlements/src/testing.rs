//! Builders shared by the unit tests of this crate.

use chrono::{Duration, Utc};
use edugate_models::catalog::{Choice, Question, QuestionGroup, SeekPoint, Video, VideoSource};
use edugate_models::codes_groups::CodesGroup;
use edugate_models::{CodesGroupId, MaterialId, QuestionGroupId, SectionId, VideoId};
use sqlx::types::Json;

pub(crate) fn empty_group() -> CodesGroup {
    CodesGroup {
        id: CodesGroupId::new(),
        name: "batch".to_string(),
        expiration: Utc::now() + Duration::days(1),
        materials_with_questions: vec![],
        materials_with_files: vec![],
        materials_with_lectures: vec![],
        sections: vec![],
        sections_for_videos: vec![],
        sections_for_questions: vec![],
        access_videos: false,
        access_questions: false,
        access_files: false,
        created_at: Utc::now(),
    }
}

pub(crate) fn question(text: &str) -> Question {
    Question {
        is_english: false,
        text: text.to_string(),
        is_multiple_choice: false,
        choices: vec![Choice {
            text: "yes".to_string(),
            is_correct: true,
        }],
        information: None,
        info_images: vec![],
    }
}

pub(crate) fn question_group(
    material_id: MaterialId,
    section_id: SectionId,
    questions: usize,
) -> QuestionGroup {
    QuestionGroup {
        id: QuestionGroupId::new(),
        material_id,
        section_id,
        paragraph: None,
        images: Json(vec![]),
        questions: Json((0..questions).map(|i| question(&format!("q{i}"))).collect()),
        created_at: Utc::now(),
    }
}

pub(crate) fn video(order_index: i32, is_free: bool, age_minutes: i64) -> Video {
    Video {
        id: VideoId::new(),
        material_id: MaterialId::new(),
        section_id: SectionId::new(),
        name: format!("video {order_index}"),
        source: Json(VideoSource {
            access_url: None,
            video_id: None,
            library_id: None,
            download_url: None,
        }),
        seek_points: Json(Vec::<SeekPoint>::new()),
        is_free,
        order_index,
        created_at: Utc::now() - Duration::minutes(age_minutes),
    }
}
