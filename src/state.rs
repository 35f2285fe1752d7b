use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::notification::NotificationHandle;
use crate::session::SessionService;
use crate::theme::ThemeStore;
use crate::ui::PageSurface;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifications: Option<NotificationHandle>,
    pub page: PageSurface,
    pub session: SessionService,
    pub theme_store: ThemeStore,
}

/// Collection ids inside the configured database.
#[derive(Debug, Clone, PartialEq)]
pub struct Collections {
    pub users: String,
    pub workers: String,
    pub customers: String,
    pub bookings: String,
    pub services: String,
    pub audit_logs: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            workers: "workers".to_string(),
            customers: "customers".to_string(),
            bookings: "bookings".to_string(),
            services: "services".to_string(),
            audit_logs: "audit-logs".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub api_key: Option<String>,
    /// User JWT for REST calls (`X-Appwrite-JWT`). The realtime endpoint does
    /// not accept it.
    pub jwt: Option<String>,
    /// Session secret (the `a_session_<project>` cookie value). Sent in the
    /// realtime `authentication` frame so documents readable only by the
    /// user still produce events.
    pub session: Option<String>,
    pub collections: Collections,
    pub theme_file: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };
        let or_default = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let defaults = Collections::default();
        let collections = Collections {
            users: or_default("APPWRITE_USERS_COLLECTION", &defaults.users),
            workers: or_default("APPWRITE_WORKERS_COLLECTION", &defaults.workers),
            customers: or_default("APPWRITE_CUSTOMERS_COLLECTION", &defaults.customers),
            bookings: or_default("APPWRITE_BOOKINGS_COLLECTION", &defaults.bookings),
            services: or_default("APPWRITE_SERVICES_COLLECTION", &defaults.services),
            audit_logs: or_default("APPWRITE_AUDIT_LOGS_COLLECTION", &defaults.audit_logs),
        };

        let port = or_default("PORT", "3000")
            .parse()
            .map_err(|_| AppError::Config("PORT must be a number".to_string()))?;

        Ok(Self {
            endpoint: required("APPWRITE_ENDPOINT")?
                .trim_end_matches('/')
                .to_string(),
            project_id: required("APPWRITE_PROJECT_ID")?,
            database_id: required("APPWRITE_DATABASE_ID")?,
            api_key: lookup("APPWRITE_API_KEY"),
            jwt: lookup("APPWRITE_JWT"),
            session: lookup("APPWRITE_SESSION"),
            collections,
            theme_file: PathBuf::from(or_default(
                "THEME_FILE",
                ".booking-notifier/preferences.json",
            )),
            host: or_default("HOST", "127.0.0.1"),
            port,
        })
    }
}
