use axum::{Router, routing::get};

use crate::modules::access::controller::{get_accessible_materials, get_my_access};
use crate::state::AppState;

pub fn init_access_router() -> Router<AppState> {
    Router::new()
        .route("/access", get(get_my_access))
        .route("/materials/accessible", get(get_accessible_materials))
}
