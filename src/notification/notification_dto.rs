use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::notification_format::time_ago;
use super::notification_state::NotificationState;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedEntryResponse {
    pub icon: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub unread: bool,
    pub time_ago: String,
}

/// Point-in-time view of a feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedSnapshot {
    pub entries: Vec<FeedEntryResponse>,
    pub unread_count: usize,
    pub badge: Option<String>,
    pub panel_open: bool,
}

impl FeedSnapshot {
    pub fn from_state(state: &NotificationState, now: DateTime<Utc>) -> Self {
        let entries = state
            .entries()
            .iter()
            .map(|entry| FeedEntryResponse {
                icon: entry.icon.clone(),
                message: entry.message.clone(),
                timestamp: entry.timestamp,
                unread: entry.unread,
                time_ago: time_ago(entry.timestamp, now),
            })
            .collect();

        Self {
            entries,
            unread_count: state.unread_count(),
            badge: state.badge(),
            panel_open: state.panel_open(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PanelResponse {
    pub panel_open: bool,
    pub badge: Option<String>,
}
