use std::convert::Infallible;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        Html, Sse,
    },
    Json,
};
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

use crate::{
    error::{AppError, Result},
    state::AppState,
};
use super::{
    notification_dto::{FeedSnapshot, PanelResponse},
    notification_service::NotificationHandle,
};

fn feed(state: &AppState) -> Result<&NotificationHandle> {
    state
        .notifications
        .as_ref()
        .ok_or_else(|| AppError::NotFound("No notification feed for this session".to_string()))
}

/// Get the notification feed of the current session
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Current feed", body = FeedSnapshot),
        (status = 404, description = "No feed for this session")
    ),
    tag = "notifications"
)]
pub async fn get_notifications(State(state): State<AppState>) -> Result<Json<FeedSnapshot>> {
    let snapshot = feed(&state)?.snapshot().await?;

    Ok(Json(snapshot))
}

/// Rendered bell, badge and panel markup
#[utoipa::path(
    get,
    path = "/api/notifications/panel",
    responses(
        (status = 200, description = "Notification container HTML", body = String, content_type = "text/html"),
        (status = 404, description = "Feed not mounted")
    ),
    tag = "notifications"
)]
pub async fn get_panel(State(state): State<AppState>) -> Result<Html<String>> {
    state
        .page
        .container_html()?
        .map(Html)
        .ok_or_else(|| AppError::NotFound("Notification feed is not mounted".to_string()))
}

/// Bell click: toggle the panel
#[utoipa::path(
    post,
    path = "/api/notifications/bell",
    responses(
        (status = 200, description = "Panel state after the toggle", body = PanelResponse),
        (status = 404, description = "No feed for this session")
    ),
    tag = "notifications"
)]
pub async fn toggle_bell(State(state): State<AppState>) -> Result<Json<PanelResponse>> {
    let handle = feed(&state)?;
    handle.toggle_panel().await?;
    let snapshot = handle.snapshot().await?;

    Ok(Json(PanelResponse {
        panel_open: snapshot.panel_open,
        badge: snapshot.badge,
    }))
}

/// Click outside the panel and the bell: close the panel
#[utoipa::path(
    post,
    path = "/api/notifications/outside-click",
    responses(
        (status = 204, description = "Panel closed"),
        (status = 404, description = "No feed for this session")
    ),
    tag = "notifications"
)]
pub async fn outside_click(State(state): State<AppState>) -> Result<StatusCode> {
    feed(&state)?.click_outside().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Clear all notifications
#[utoipa::path(
    delete,
    path = "/api/notifications",
    responses(
        (status = 204, description = "Feed cleared"),
        (status = 404, description = "No feed for this session")
    ),
    tag = "notifications"
)]
pub async fn clear_notifications(State(state): State<AppState>) -> Result<StatusCode> {
    feed(&state)?.clear_all().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Subscribe to alert transitions via Server-Sent Events
#[utoipa::path(
    get,
    path = "/api/notifications/stream",
    responses(
        (status = 200, description = "SSE stream of alerts")
    ),
    tag = "notifications"
)]
pub async fn alert_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.page.alerts().subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(alert) => Event::default().event("alert").json_data(&alert).ok().map(Ok),
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
