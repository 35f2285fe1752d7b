use super::notification_format::humanize_category;
use super::notification_models::{
    BookingChangeEvent, BookingDocument, BookingStatus, EventKind, Notice, Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessage {
    pub icon: &'static str,
    pub text: &'static str,
}

pub const FALLBACK_STATUS: StatusMessage = StatusMessage {
    icon: "📋",
    text: "Booking updated",
};

pub fn status_message(status: Option<&str>) -> StatusMessage {
    let Some(status) = status.and_then(BookingStatus::parse) else {
        return FALLBACK_STATUS;
    };

    match status {
        BookingStatus::Pending => StatusMessage {
            icon: "🕐",
            text: "New booking request received",
        },
        BookingStatus::Accepted => StatusMessage {
            icon: "✅",
            text: "Booking has been accepted",
        },
        BookingStatus::InProgress => StatusMessage {
            icon: "🔧",
            text: "Job is in progress",
        },
        BookingStatus::Completed => StatusMessage {
            icon: "🎉",
            text: "Job has been completed",
        },
        BookingStatus::Cancelled => StatusMessage {
            icon: "❌",
            text: "Booking has been cancelled",
        },
    }
}

/// A booking concerns the user only through the field matching their role.
pub fn is_relevant(document: &BookingDocument, user_id: &str, role: Role) -> bool {
    document.owner(role) == Some(user_id)
}

/// A create label wins over an update label.
pub fn resolve_kind(events: &[String]) -> EventKind {
    if events.iter().any(|e| e.contains(".create")) {
        EventKind::Create
    } else if events.iter().any(|e| e.contains(".update")) {
        EventKind::Update
    } else {
        EventKind::Other
    }
}

fn with_category(text: &str, category: Option<&str>) -> String {
    match category.filter(|c| !c.is_empty()) {
        Some(category) => format!("{} — {}", text, humanize_category(category)),
        None => text.to_string(),
    }
}

/// Notice for a document that reached its current status.
pub fn status_notice(document: &BookingDocument) -> Notice {
    let status = status_message(document.status.as_deref());
    Notice {
        icon: status.icon.to_string(),
        message: with_category(status.text, document.service_category.as_deref()),
    }
}

fn creation_notice(document: &BookingDocument, role: Role) -> Notice {
    let (icon, text) = match role {
        Role::Worker => ("📥", "New job request"),
        Role::Customer => ("📤", "Booking created"),
    };
    Notice {
        icon: icon.to_string(),
        message: with_category(text, document.service_category.as_deref()),
    }
}

/// Decides whether a pushed change produces a notification for this user.
pub fn classify_event(event: &BookingChangeEvent, user_id: &str, role: Role) -> Option<Notice> {
    if !is_relevant(&event.document, user_id, role) {
        return None;
    }

    match resolve_kind(&event.events) {
        EventKind::Create => Some(creation_notice(&event.document, role)),
        EventKind::Update => Some(status_notice(&event.document)),
        EventKind::Other => None,
    }
}
