use axum::{extract::State, Json};

use crate::{
    error::{AppError, Result},
    state::AppState,
};
use super::session_models::{LogoutResponse, SessionResponse};

/// Current user, role and dashboard
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Signed-in user", body = SessionResponse),
        (status = 401, description = "No active session")
    ),
    tag = "session"
)]
pub async fn get_session(State(state): State<AppState>) -> Result<Json<SessionResponse>> {
    let user = state
        .session
        .get_current_user()
        .await
        .ok_or_else(|| AppError::Unauthorized("No active session".to_string()))?;

    let role = state.session.get_user_role(&user.id).await;

    Ok(Json(SessionResponse {
        dashboard: role.map(|r| r.dashboard_path().to_string()),
        user,
        role,
    }))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/session/logout",
    responses(
        (status = 200, description = "Session ended", body = LogoutResponse),
        (status = 401, description = "No active session")
    ),
    tag = "session"
)]
pub async fn logout(State(state): State<AppState>) -> Result<Json<LogoutResponse>> {
    let redirect = state.session.logout().await?;

    Ok(Json(LogoutResponse {
        redirect: redirect.to_string(),
    }))
}
