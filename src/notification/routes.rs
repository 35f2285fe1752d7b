use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use super::notification_handlers;

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notification_handlers::get_notifications)
                .delete(notification_handlers::clear_notifications),
        )
        .route("/panel", get(notification_handlers::get_panel))
        .route("/bell", post(notification_handlers::toggle_bell))
        .route("/outside-click", post(notification_handlers::outside_click))
        .route("/stream", get(notification_handlers::alert_stream))
}
