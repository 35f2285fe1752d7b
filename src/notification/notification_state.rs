use std::collections::VecDeque;

use super::notification_format::badge_label;
use super::notification_models::NotificationEntry;

/// Upper bound on the number of entries held by one feed.
pub const MAX_NOTIFICATIONS: usize = 20;

/// In-memory feed of one page session. Entries are newest first.
///
/// `unread_count` counts additions since the panel was last opened, so it can
/// exceed the number of retained entries once older ones have been evicted.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    entries: VecDeque<NotificationEntry>,
    unread_count: usize,
    panel_open: bool,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a live entry, returning the evicted tail entry if the feed was full.
    pub fn push(&mut self, entry: NotificationEntry) -> Option<NotificationEntry> {
        self.entries.push_front(entry);
        self.unread_count += 1;

        if self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Appends a history entry behind everything already present.
    pub fn append_history(&mut self, entry: NotificationEntry) {
        if self.entries.len() < MAX_NOTIFICATIONS {
            self.entries.push_back(entry);
        }
    }

    /// Flips the panel. Opening it marks every entry read and resets the counter.
    pub fn toggle_panel(&mut self) -> bool {
        self.panel_open = !self.panel_open;
        if self.panel_open {
            self.mark_all_read();
        }
        self.panel_open
    }

    /// Closes the panel; returns whether anything changed.
    pub fn close_panel(&mut self) -> bool {
        std::mem::replace(&mut self.panel_open, false)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.unread_count = 0;
    }

    fn mark_all_read(&mut self) {
        self.unread_count = 0;
        for entry in &mut self.entries {
            entry.unread = false;
        }
    }

    pub fn entries(&self) -> &VecDeque<NotificationEntry> {
        &self.entries
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn badge(&self) -> Option<String> {
        badge_label(self.unread_count)
    }
}
