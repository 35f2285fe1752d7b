pub mod routes;
pub mod theme_handlers;
pub mod theme_models;
pub mod theme_store;

pub use theme_models::{Theme, ThemeIcons, ThemeResponse};
pub use theme_store::{ThemeStore, THEME_KEY};
