pub mod import_models;
pub mod import_service;

pub use import_models::{ImportFailure, ImportReport, JobRecord};
pub use import_service::{import_jobs, load_records, DEFAULT_IMPORT_FILE};
