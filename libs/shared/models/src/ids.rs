//! Identifier normalization for duck-typed backend responses.
//!
//! Record ids arrive as JSON numbers or strings depending on the endpoint;
//! everything client-side works with opaque strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Extract an id from a JSON value, accepting strings and numbers.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Deserialize a required string-or-number id field.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| serde::de::Error::custom("expected a string or numeric id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numeric_and_string_ids() {
        assert_eq!(id_from_value(&json!(42)), Some("42".to_string()));
        assert_eq!(id_from_value(&json!("42")), Some("42".to_string()));
    }

    #[test]
    fn rejects_null_and_empty_ids() {
        assert_eq!(id_from_value(&json!(null)), None);
        assert_eq!(id_from_value(&json!("")), None);
    }
}
