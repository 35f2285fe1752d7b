use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::appwrite::Account;
use crate::error::{AppError, Result};
use crate::notification::Role;

pub const LOGOUT_REDIRECT: &str = "/index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Worker,
    Admin,
}

impl UserRole {
    /// Feed perspective for this role; admins have no booking feed.
    pub fn feed_role(self) -> Option<Role> {
        match self {
            UserRole::Customer => Some(Role::Customer),
            UserRole::Worker => Some(Role::Worker),
            UserRole::Admin => None,
        }
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            UserRole::Customer => "/customer/dashboard.html",
            UserRole::Worker => "/worker/dashboard.html",
            UserRole::Admin => "/admin/dashboard.html",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Customer => write!(f, "customer"),
            UserRole::Worker => write!(f, "worker"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "customer" => Ok(UserRole::Customer),
            "worker" => Ok(UserRole::Worker),
            "admin" => Ok(UserRole::Admin),
            other => Err(AppError::Validation(format!("Invalid role: {}", other))),
        }
    }
}

/// Document in the users collection linking an account to its role.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: Account,
    pub role: Option<UserRole>,
    pub dashboard: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub redirect: String,
}
