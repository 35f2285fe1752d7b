use askama::Template;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::notification::{time_ago, NotificationEntry};

struct FeedItem<'a> {
    icon: &'a str,
    message: &'a str,
    time_ago: String,
    unread: bool,
}

#[derive(Template)]
#[template(path = "notifications/list.html")]
struct FeedListTemplate<'a> {
    items: Vec<FeedItem<'a>>,
}

#[derive(Template)]
#[template(path = "notifications/container.html")]
struct FeedContainerTemplate<'a> {
    list_html: &'a str,
    badge: Option<&'a str>,
    badge_text: &'a str,
    panel_open: bool,
}

/// Full list markup; relative times are computed against `now`.
pub fn render_feed_html<'a, I>(entries: I, now: DateTime<Utc>) -> Result<String>
where
    I: IntoIterator<Item = &'a NotificationEntry>,
{
    let items = entries
        .into_iter()
        .map(|entry| FeedItem {
            icon: &entry.icon,
            message: &entry.message,
            time_ago: time_ago(entry.timestamp, now),
            unread: entry.unread,
        })
        .collect();

    Ok(FeedListTemplate { items }.render()?)
}

/// Bell, badge and panel around an already rendered list.
pub fn render_container_html(
    list_html: &str,
    badge: Option<&str>,
    panel_open: bool,
) -> Result<String> {
    let template = FeedContainerTemplate {
        list_html,
        badge,
        badge_text: badge.unwrap_or("0"),
        panel_open,
    };

    Ok(template.render()?)
}
