use axum::{Router, routing::post};

use crate::modules::free_questions::controller::rebuild_free_pool;
use crate::state::AppState;

pub fn init_free_questions_router() -> Router<AppState> {
    Router::new().route("/rebuild", post(rebuild_free_pool))
}
