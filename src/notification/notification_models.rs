use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::appwrite::RealtimeEvent;
use crate::error::{AppError, Result};

/// Viewing perspective of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Worker,
}

impl Role {
    /// Booking attribute that identifies this role's side of a booking.
    pub fn owner_field(self) -> &'static str {
        match self {
            Role::Customer => "customerId",
            Role::Worker => "workerId",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "customer" => Ok(Role::Customer),
            "worker" => Ok(Role::Worker),
            other => Err(AppError::Validation(format!("Unknown feed role: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "pending" => Some(BookingStatus::Pending),
            "accepted" => Some(BookingStatus::Accepted),
            "in-progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// Read-only projection of a booking document. Every field is optional so a
/// partial payload still decodes; absent owner ids simply never match a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDocument {
    #[serde(rename = "$id", default)]
    pub id: String,
    #[serde(rename = "customerId", default)]
    pub customer_id: Option<String>,
    #[serde(rename = "workerId", default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "serviceCategory", default)]
    pub service_category: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookingDocument {
    pub fn owner(&self, role: Role) -> Option<&str> {
        match role {
            Role::Customer => self.customer_id.as_deref(),
            Role::Worker => self.worker_id.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Create,
    Update,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingChangeEvent {
    pub document: BookingDocument,
    pub events: Vec<String>,
}

impl TryFrom<RealtimeEvent> for BookingChangeEvent {
    type Error = AppError;

    fn try_from(event: RealtimeEvent) -> Result<Self> {
        Ok(Self {
            document: serde_json::from_value(event.payload)?,
            events: event.events,
        })
    }
}

/// Icon and text produced for one booking change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub icon: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NotificationEntry {
    pub icon: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub unread: bool,
}

impl NotificationEntry {
    pub fn unread(notice: Notice, timestamp: DateTime<Utc>) -> Self {
        Self {
            icon: notice.icon,
            message: notice.message,
            timestamp,
            unread: true,
        }
    }

    pub fn read(notice: Notice, timestamp: DateTime<Utc>) -> Self {
        Self {
            unread: false,
            ..Self::unread(notice, timestamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("worker".parse::<Role>().unwrap(), Role::Worker);
        assert_eq!(Role::Customer.to_string(), "customer");
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Worker.owner_field(), "workerId");
    }

    #[test]
    fn test_booking_status_parse() {
        assert_eq!(BookingStatus::parse("in-progress"), Some(BookingStatus::InProgress));
        assert_eq!(BookingStatus::parse("archived"), None);
    }

    #[test]
    fn test_booking_document_tolerates_missing_fields() {
        let doc: BookingDocument = serde_json::from_value(json!({"$id": "b1"})).unwrap();
        assert_eq!(doc.id, "b1");
        assert!(doc.owner(Role::Worker).is_none());
        assert!(doc.status.is_none());
    }

    #[test]
    fn test_booking_document_reads_backend_timestamp() {
        let doc: BookingDocument = serde_json::from_value(json!({
            "$id": "b1",
            "workerId": "W1",
            "status": "pending",
            "serviceCategory": "home-cleaning",
            "$updatedAt": "2024-05-01T10:00:00.000+00:00"
        }))
        .unwrap();

        assert_eq!(doc.owner(Role::Worker), Some("W1"));
        assert_eq!(doc.updated_at.unwrap().to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_change_event_from_realtime() {
        let raw = RealtimeEvent {
            events: vec!["databases.db.collections.bookings.documents.b1.create".into()],
            channels: vec![],
            payload: json!({"$id": "b1", "customerId": "C1"}),
        };
        let event = BookingChangeEvent::try_from(raw).unwrap();
        assert_eq!(event.document.owner(Role::Customer), Some("C1"));
    }

    #[test]
    fn test_change_event_rejects_non_object_payload() {
        let raw = RealtimeEvent {
            events: vec![],
            channels: vec![],
            payload: json!("oops"),
        };
        assert!(BookingChangeEvent::try_from(raw).is_err());
    }
}
