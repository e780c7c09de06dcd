use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::modules::catalog::controller::{
    create_file, create_material, create_question_group, create_section, create_video,
    delete_file, delete_material, delete_question, delete_question_group, delete_section,
    delete_video, get_files, get_material, get_materials, get_question_groups, get_sections,
    get_videos, reorder_videos, set_video_free, update_file, update_material, update_question,
    update_question_group, update_section, update_video,
};
use crate::state::AppState;

pub fn init_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/materials", post(create_material).get(get_materials))
        .route(
            "/materials/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/sections", post(create_section).get(get_sections))
        .route("/sections/{id}", put(update_section).delete(delete_section))
        .route("/videos", post(create_video).get(get_videos))
        .route("/videos/reorder", put(reorder_videos))
        .route("/videos/{id}", put(update_video).delete(delete_video))
        .route("/videos/{id}/free", patch(set_video_free))
        .route(
            "/question-groups",
            post(create_question_group).get(get_question_groups),
        )
        .route(
            "/question-groups/{id}",
            put(update_question_group).delete(delete_question_group),
        )
        .route(
            "/question-groups/{id}/questions/{index}",
            put(update_question).delete(delete_question),
        )
        .route("/files", post(create_file).get(get_files))
        .route("/files/{id}", put(update_file).delete(delete_file))
}
