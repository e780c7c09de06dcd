use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::codes_groups::controller::{
    delete_codes_group, generate_codes, get_codes, get_codes_group, get_codes_groups,
};
use crate::state::AppState;

pub fn init_codes_groups_router() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_codes).get(get_codes_groups))
        .route("/{id}", get(get_codes_group).delete(delete_codes_group))
        .route("/{id}/codes", get(get_codes))
}
