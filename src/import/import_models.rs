use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// One job as it appears in an import file. Fields other than `serviceType`
/// are passed through to the booking document untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobRecord {
    #[serde(rename = "serviceType", default)]
    #[validate(length(min = 1, message = "serviceType must not be empty"))]
    pub service_type: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportFailure {
    pub index: usize,
    pub label: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub added: usize,
    pub failed: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.added + self.failed.len()
    }
}
