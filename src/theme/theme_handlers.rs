use axum::{extract::State, Json};

use crate::{error::Result, state::AppState};
use super::theme_models::ThemeResponse;

/// Current theme preference
#[utoipa::path(
    get,
    path = "/api/theme",
    responses(
        (status = 200, description = "Active theme", body = ThemeResponse)
    ),
    tag = "theme"
)]
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(state.theme_store.init_theme().await.into())
}

/// Switch between dark and light
#[utoipa::path(
    post,
    path = "/api/theme/toggle",
    responses(
        (status = 200, description = "Theme after the switch", body = ThemeResponse)
    ),
    tag = "theme"
)]
pub async fn toggle_theme(State(state): State<AppState>) -> Result<Json<ThemeResponse>> {
    let theme = state.theme_store.toggle_theme().await?;

    Ok(Json(theme.into()))
}
