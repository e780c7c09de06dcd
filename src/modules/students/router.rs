use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::modules::students::controller::{
    create_student, get_student, get_student_access, get_students, set_student_blocked,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route("/{id}", get(get_student))
        .route("/{id}/access", get(get_student_access))
        .route("/{id}/block", patch(set_student_blocked))
}
