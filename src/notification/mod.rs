// Declare submodules
pub mod notification_classifier;
pub mod notification_dto;
pub mod notification_format;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;
pub mod notification_state;
pub mod routes;

// Re-export public items
pub use notification_classifier::{classify_event, is_relevant, resolve_kind, status_message};
pub use notification_dto::{FeedEntryResponse, FeedSnapshot, PanelResponse};
pub use notification_format::{badge_label, humanize_category, time_ago};
pub use notification_models::{
    BookingChangeEvent, BookingDocument, BookingStatus, EventKind, NotificationEntry, Role,
};
pub use notification_repository::BookingRepository;
pub use notification_service::{
    init_notifications, NotificationDeps, NotificationEngine, NotificationHandle,
};
pub use notification_state::{NotificationState, MAX_NOTIFICATIONS};
