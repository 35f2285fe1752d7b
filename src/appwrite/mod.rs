//! Client side of the hosted backend: document queries, account calls and
//! the realtime change feed.

pub mod client;
pub mod query;
pub mod realtime;
pub mod types;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::error::Result;

pub use client::AppwriteClient;
pub use query::Query;
pub use realtime::{booking_channel, ReconnectBackoff};
pub use types::{Account, DocumentList, RealtimeEvent};

/// Stream of change events for one subscribed channel.
pub type EventStream = BoxStream<'static, Result<RealtimeEvent>>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList<Value>>;

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Value,
    ) -> Result<Value>;
}

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Opens a subscription; the stream stays open until the backend closes it.
    async fn subscribe(&self, channel: &str) -> Result<EventStream>;
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn get_account(&self) -> Result<Account>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;
}

/// Mints a document id the backend accepts (at most 36 chars of `[a-zA-Z0-9]`).
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
