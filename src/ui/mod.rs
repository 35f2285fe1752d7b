//! Rendering side of the notification feed and the page-level alert and
//! loading primitives.

pub mod alert;
pub mod page;
pub mod render;

pub use alert::{Alert, AlertCenter, AlertKind, AlertPhase};
pub use page::PageSurface;

use std::collections::VecDeque;

use crate::notification::NotificationEntry;

/// Output surface driven by a notification engine. Every call replaces what
/// was shown before; implementations never diff.
pub trait FeedRenderer: Send + Sync {
    /// Inserts the bell, badge and panel. Repeated calls are no-ops.
    fn mount(&self);

    /// Replaces the list with `entries`, newest first.
    fn render_list(&self, entries: &VecDeque<NotificationEntry>);

    fn render_badge(&self, badge: Option<&str>);

    fn render_panel(&self, open: bool);

    /// Surfaces a transient alert for a new entry.
    fn toast(&self, message: &str);
}
