use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use super::theme_handlers;

pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(theme_handlers::get_theme))
        .route("/toggle", post(theme_handlers::toggle_theme))
}
