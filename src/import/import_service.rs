use std::path::Path;

use serde_json::Value;
use tracing::{error, info};
use validator::Validate;

use crate::appwrite::{unique_id, DocumentStore};
use crate::error::{AppError, Result};
use super::import_models::{ImportFailure, ImportReport, JobRecord};

pub const DEFAULT_IMPORT_FILE: &str = "./demo-jobs-worker-a1.json";

/// Reads the import file; anything but a JSON array is rejected outright.
pub async fn load_records(path: &Path) -> Result<Vec<Value>> {
    let text = tokio::fs::read_to_string(path).await?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(records) => Ok(records),
        _ => Err(AppError::Validation(format!(
            "{} must contain a JSON array of jobs",
            path.display()
        ))),
    }
}

fn record_label(raw: &Value, index: usize) -> String {
    raw.get("serviceType")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("record #{}", index + 1))
}

async fn import_one(
    store: &dyn DocumentStore,
    database_id: &str,
    collection_id: &str,
    raw: Value,
) -> Result<Value> {
    let record: JobRecord = serde_json::from_value(raw)?;
    record.validate()?;

    let data = serde_json::to_value(&record)?;
    store
        .create_document(database_id, collection_id, &unique_id(), &data)
        .await
}

/// Creates one booking per record. A failing record is logged and skipped;
/// the batch always runs to the end.
pub async fn import_jobs(
    store: &dyn DocumentStore,
    database_id: &str,
    collection_id: &str,
    records: Vec<Value>,
) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, raw) in records.into_iter().enumerate() {
        let label = record_label(&raw, index);
        match import_one(store, database_id, collection_id, raw).await {
            Ok(_) => {
                info!("✅ Added: {}", label);
                report.added += 1;
            }
            Err(e) => {
                error!("❌ Failed: {} {}", label, e);
                report.failed.push(ImportFailure {
                    index,
                    label,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!("🎉 Import complete!");
    report
}
