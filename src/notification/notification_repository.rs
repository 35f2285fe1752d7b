use std::sync::Arc;

use crate::appwrite::{DocumentStore, Query};
use crate::error::Result;
use super::notification_models::{BookingDocument, Role};

/// Number of bookings loaded as feed history.
pub const HISTORY_LIMIT: u32 = 5;

#[derive(Clone)]
pub struct BookingRepository {
    store: Arc<dyn DocumentStore>,
    database_id: String,
    collection_id: String,
}

impl BookingRepository {
    pub fn new(store: Arc<dyn DocumentStore>, database_id: &str, collection_id: &str) -> Self {
        Self {
            store,
            database_id: database_id.to_string(),
            collection_id: collection_id.to_string(),
        }
    }

    /// Most recently updated bookings on the user's side, newest first.
    pub async fn find_recent_by_user(
        &self,
        user_id: &str,
        role: Role,
        limit: u32,
    ) -> Result<Vec<BookingDocument>> {
        let queries = [
            Query::equal(role.owner_field(), user_id),
            Query::order_desc("$updatedAt"),
            Query::limit(limit),
        ];

        let list = self
            .store
            .list_documents(&self.database_id, &self.collection_id, &queries)
            .await?
            .decode::<BookingDocument>()?;

        Ok(list.documents)
    }
}
