use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use super::session_handlers;

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(session_handlers::get_session))
        .route("/logout", post(session_handlers::logout))
}
