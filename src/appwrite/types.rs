use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList<T> {
    #[serde(default)]
    pub total: u64,
    pub documents: Vec<T>,
}

impl DocumentList<Value> {
    /// Decodes every raw document into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<DocumentList<T>> {
        let documents = self
            .documents
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;

        Ok(DocumentList {
            total: self.total,
            documents,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Error body returned by the backend for non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: u16,
}

impl From<RemoteErrorBody> for AppError {
    fn from(body: RemoteErrorBody) -> Self {
        AppError::Remote {
            code: body.code,
            message: body.message,
        }
    }
}

/// One change pushed on a realtime channel: the document plus its event labels,
/// e.g. `databases.db.collections.bookings.documents.abc.update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeEvent {
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub payload: Value,
}

/// Outer realtime frame; `data` is interpreted according to `kind`.
#[derive(Debug, Deserialize)]
pub(crate) struct RealtimeFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_decode_document_list() {
        let list: DocumentList<Value> = serde_json::from_value(json!({
            "total": 2,
            "documents": [{"name": "a"}, {"name": "b"}]
        }))
        .unwrap();

        let decoded = list.decode::<Named>().unwrap();
        assert_eq!(decoded.total, 2);
        assert_eq!(decoded.documents[1].name, "b");
    }

    #[test]
    fn test_decode_document_list_rejects_bad_document() {
        let list: DocumentList<Value> =
            serde_json::from_value(json!({"documents": [{"other": 1}]})).unwrap();
        assert!(matches!(list.decode::<Named>(), Err(AppError::Json(_))));
    }

    #[test]
    fn test_account_reads_dollar_id() {
        let account: Account =
            serde_json::from_value(json!({"$id": "U1", "name": "Asha", "email": "a@b.c"}))
                .unwrap();
        assert_eq!(account.id, "U1");
    }
}
