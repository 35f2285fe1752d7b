pub mod routes;
pub mod session_handlers;
pub mod session_models;
pub mod session_service;

pub use session_models::{LogoutResponse, SessionResponse, UserProfile, UserRole};
pub use session_service::SessionService;
