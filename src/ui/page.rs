use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use super::alert::{AlertCenter, AlertKind};
use super::render::{render_container_html, render_feed_html};
use super::FeedRenderer;
use crate::error::Result;
use crate::notification::NotificationEntry;

#[derive(Debug, Clone, Default)]
struct PageState {
    mounted: bool,
    list_html: String,
    badge: Option<String>,
    panel_open: bool,
}

/// The page as served to the browser: last rendered feed markup plus alerts.
#[derive(Clone, Default)]
pub struct PageSurface {
    state: Arc<RwLock<PageState>>,
    alerts: AlertCenter,
}

impl PageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> &AlertCenter {
        &self.alerts
    }

    fn update(&self, f: impl FnOnce(&mut PageState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    pub fn is_mounted(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .mounted
    }

    /// Container markup, or `None` before the feed has been mounted.
    pub fn container_html(&self) -> Result<Option<String>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if !state.mounted {
            return Ok(None);
        }
        render_container_html(&state.list_html, state.badge.as_deref(), state.panel_open).map(Some)
    }

    fn replace_list<'a, I>(&self, entries: I)
    where
        I: IntoIterator<Item = &'a NotificationEntry>,
    {
        match render_feed_html(entries, Utc::now()) {
            Ok(html) => self.update(|state| state.list_html = html),
            Err(e) => tracing::error!("Failed to render notification list: {}", e),
        }
    }
}

impl FeedRenderer for PageSurface {
    fn mount(&self) {
        let mut newly_mounted = false;
        self.update(|state| {
            newly_mounted = !std::mem::replace(&mut state.mounted, true);
        });
        if newly_mounted {
            self.replace_list(std::iter::empty::<&NotificationEntry>());
            tracing::debug!("Notification container mounted");
        }
    }

    fn render_list(&self, entries: &VecDeque<NotificationEntry>) {
        self.replace_list(entries);
    }

    fn render_badge(&self, badge: Option<&str>) {
        self.update(|state| state.badge = badge.map(str::to_string));
    }

    fn render_panel(&self, open: bool) {
        self.update(|state| state.panel_open = open);
    }

    fn toast(&self, message: &str) {
        self.alerts.show_alert(message, AlertKind::Info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_is_idempotent() {
        let page = PageSurface::new();
        assert!(page.container_html().unwrap().is_none());

        page.mount();
        page.render_badge(Some("3"));
        page.mount();

        let html = page.container_html().unwrap().unwrap();
        assert_eq!(html.matches("notif-container").count(), 1);
        assert!(html.contains(">3</span>"));
    }

    #[test]
    fn test_render_list_replaces_markup() {
        let page = PageSurface::new();
        page.mount();
        assert!(page.container_html().unwrap().unwrap().contains("No notifications yet"));

        page.render_list(&VecDeque::from(vec![NotificationEntry {
            icon: "✅".into(),
            message: "Booking has been accepted — plumbing".into(),
            timestamp: Utc::now(),
            unread: true,
        }]));
        let html = page.container_html().unwrap().unwrap();
        assert!(html.contains("Booking has been accepted"));
        assert!(!html.contains("No notifications yet"));

        page.render_list(&VecDeque::new());
        assert!(page.container_html().unwrap().unwrap().contains("No notifications yet"));
    }

    #[tokio::test]
    async fn test_toast_goes_to_alert_center() {
        let page = PageSurface::new();
        page.toast("📤 Booking created — plumbing");
        let active = page.alerts().active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, AlertKind::Info);
    }
}
