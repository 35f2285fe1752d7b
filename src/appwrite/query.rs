use serde_json::{json, Value};

/// A single list filter, sent to the backend as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    method: &'static str,
    attribute: Option<String>,
    values: Vec<Value>,
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.into()),
            values: vec![value.into()],
        }
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self {
            method: "orderDesc",
            attribute: Some(attribute.into()),
            values: Vec::new(),
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![json!(limit)],
        }
    }

    pub fn to_json_string(&self) -> String {
        let mut query = json!({ "method": self.method });
        if let Some(attribute) = &self.attribute {
            query["attribute"] = json!(attribute);
        }
        if !self.values.is_empty() {
            query["values"] = Value::Array(self.values.clone());
        }
        query.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(query: &Query) -> Value {
        serde_json::from_str(&query.to_json_string()).unwrap()
    }

    #[test]
    fn test_equal_query() {
        assert_eq!(
            parsed(&Query::equal("workerId", "U1")),
            json!({"method": "equal", "attribute": "workerId", "values": ["U1"]})
        );
    }

    #[test]
    fn test_order_desc_has_no_values() {
        assert_eq!(
            parsed(&Query::order_desc("$updatedAt")),
            json!({"method": "orderDesc", "attribute": "$updatedAt"})
        );
    }

    #[test]
    fn test_limit_has_no_attribute() {
        assert_eq!(parsed(&Query::limit(5)), json!({"method": "limit", "values": [5]}));
    }
}
