pub mod appwrite;
pub mod error;
pub mod import;
pub mod notification;
pub mod routes;
pub mod session;
pub mod state;
pub mod theme;
pub mod ui;
