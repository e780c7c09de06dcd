use axum::{Router, routing::get};

use crate::modules::content::controller::{
    get_exam, get_files, get_free_questions, get_free_videos, get_question, get_questions,
    get_videos, list_materials, list_sections,
};
use crate::state::AppState;

pub fn init_content_router() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials))
        .route("/sections", get(list_sections))
        .route("/questions", get(get_questions))
        .route("/question", get(get_question))
        .route("/videos", get(get_videos))
        .route("/materials/{id}/files", get(get_files))
        .route("/materials/{id}/exam", get(get_exam))
        .route("/free-questions", get(get_free_questions))
        .route("/free-videos", get(get_free_videos))
}
