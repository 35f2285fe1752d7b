use crate::{
    appwrite::Account,
    notification::{self, routes::notification_routes, FeedEntryResponse, FeedSnapshot, PanelResponse},
    session::{self, routes::session_routes, LogoutResponse, SessionResponse, UserRole},
    state::AppState,
    theme::{self, routes::theme_routes, Theme, ThemeIcons, ThemeResponse},
    ui::{Alert, AlertKind, AlertPhase},
};
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        notification::notification_handlers::get_notifications,
        notification::notification_handlers::get_panel,
        notification::notification_handlers::toggle_bell,
        notification::notification_handlers::outside_click,
        notification::notification_handlers::clear_notifications,
        notification::notification_handlers::alert_stream,
        session::session_handlers::get_session,
        session::session_handlers::logout,
        theme::theme_handlers::get_theme,
        theme::theme_handlers::toggle_theme,
    ),
    components(
        schemas(
            FeedSnapshot,
            FeedEntryResponse,
            PanelResponse,
            Alert,
            AlertKind,
            AlertPhase,
            Account,
            SessionResponse,
            LogoutResponse,
            UserRole,
            Theme,
            ThemeIcons,
            ThemeResponse,
        )
    ),
    tags(
        (name = "notifications", description = "Booking notification feed"),
        (name = "session", description = "Signed-in user"),
        (name = "theme", description = "Light/dark preference")
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/notifications", notification_routes())
        .nest("/session", session_routes())
        .nest("/theme", theme_routes());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
