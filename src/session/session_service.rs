use std::sync::Arc;

use tracing::{error, warn};

use crate::appwrite::{Account, AccountApi, DocumentStore, Query};
use crate::error::Result;
use super::session_models::{UserProfile, UserRole, LOGOUT_REDIRECT};

/// Account and role lookups for the signed-in user.
#[derive(Clone)]
pub struct SessionService {
    accounts: Arc<dyn AccountApi>,
    store: Arc<dyn DocumentStore>,
    database_id: String,
    users_collection: String,
}

impl SessionService {
    pub fn new(
        accounts: Arc<dyn AccountApi>,
        store: Arc<dyn DocumentStore>,
        database_id: &str,
        users_collection: &str,
    ) -> Self {
        Self {
            accounts,
            store,
            database_id: database_id.to_string(),
            users_collection: users_collection.to_string(),
        }
    }

    /// `None` when there is no usable session.
    pub async fn get_current_user(&self) -> Option<Account> {
        match self.accounts.get_account().await {
            Ok(account) => Some(account),
            Err(e) => {
                error!("No active session: {}", e);
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.get_current_user().await.is_some()
    }

    pub async fn get_user_role(&self, user_id: &str) -> Option<UserRole> {
        match self.find_profile(user_id).await {
            Ok(Some(profile)) => match profile.role.parse() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!("User {} has an unusable role: {}", user_id, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Error fetching user role: {}", e);
                None
            }
        }
    }

    async fn find_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let list = self
            .store
            .list_documents(
                &self.database_id,
                &self.users_collection,
                &[Query::equal("userId", user_id)],
            )
            .await?
            .decode::<UserProfile>()?;

        Ok(list.documents.into_iter().next())
    }

    /// Ends the current session and returns where the browser should go next.
    pub async fn logout(&self) -> Result<&'static str> {
        self.accounts
            .delete_session("current")
            .await
            .map_err(|e| {
                error!("Logout error: {}", e);
                e
            })?;

        Ok(LOGOUT_REDIRECT)
    }
}
