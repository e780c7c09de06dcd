use axum::{Router, routing::post};

use crate::modules::redemptions::controller::{get_my_redemptions, redeem_code};
use crate::state::AppState;

pub fn init_redemptions_router() -> Router<AppState> {
    Router::new().route("/", post(redeem_code).get(get_my_redemptions))
}
