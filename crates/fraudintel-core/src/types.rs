//! Shared value types for task inputs and outputs.
//!
//! Every field that crosses a task boundary is a [`FieldValue`]: plain text,
//! an ordered list of strings, a scalar score, or an ordered list of scores.
//! Field maps use `BTreeMap` so iteration order is deterministic, which keeps
//! prompt rendering and cache keys stable across runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{FieldType, SchemaError};

/// A typed value for one named task field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain text (narratives, headlines, JSON-encoded case data).
    Text(String),

    /// Ordered list of strings (hypotheses, evidence snippets, requests).
    TextList(Vec<String>),

    /// Single score in [0, 1] (judge criteria).
    Float(f64),

    /// Ordered list of scores (per-hypothesis confidence).
    FloatList(Vec<f64>),
}

/// Ordered mapping from field name to value.
pub type FieldMap = BTreeMap<String, FieldValue>;

impl FieldValue {
    /// Coerce a JSON value into a field value of the declared type.
    ///
    /// Numbers inside a `TextList` are not coerced to strings; a task that
    /// declares strings must produce strings.
    pub fn from_json(ty: FieldType, field: &str, value: &serde_json::Value) -> Result<Self, SchemaError> {
        use serde_json::Value;

        let mismatch = || SchemaError::WrongType {
            field: field.to_string(),
            expected: ty,
        };

        match ty {
            FieldType::Text => match value {
                Value::String(s) => Ok(FieldValue::Text(s.clone())),
                _ => Err(mismatch()),
            },
            FieldType::Float => match value.as_f64() {
                Some(f) => Ok(FieldValue::Float(f)),
                None => Err(mismatch()),
            },
            FieldType::TextList => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).ok_or_else(mismatch))
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::TextList),
                _ => Err(mismatch()),
            },
            FieldType::FloatList => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_f64().ok_or_else(mismatch))
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::FloatList),
                _ => Err(mismatch()),
            },
        }
    }

    /// The declared type this value satisfies.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::TextList(_) => FieldType::TextList,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::FloatList(_) => FieldType::FloatList,
        }
    }

    /// Whether the value carries no content (empty/whitespace text, empty list).
    ///
    /// Scalar floats always count as content.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::TextList(items) => items.iter().all(|s| s.trim().is_empty()),
            FieldValue::Float(_) => false,
            FieldValue::FloatList(items) => items.is_empty(),
        }
    }

    /// Trim surrounding whitespace from text content in place.
    pub fn trim_text(&mut self) {
        match self {
            FieldValue::Text(s) => *s = s.trim().to_string(),
            FieldValue::TextList(items) => {
                for s in items.iter_mut() {
                    *s = s.trim().to_string();
                }
            }
            FieldValue::Float(_) | FieldValue::FloatList(_) => {}
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::TextList(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            FieldValue::FloatList(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::TextList(items)
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(items: Vec<f64>) -> Self {
        FieldValue::FloatList(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_respects_declared_type() {
        let text = FieldValue::from_json(FieldType::Text, "headline", &json!("ATO case")).unwrap();
        assert_eq!(text, FieldValue::Text("ATO case".to_string()));

        let list =
            FieldValue::from_json(FieldType::TextList, "hypotheses", &json!(["a", "b"])).unwrap();
        assert_eq!(list.as_text_list().unwrap().len(), 2);

        let scores =
            FieldValue::from_json(FieldType::FloatList, "confidence_scores", &json!([0.9, 0.4]))
                .unwrap();
        assert_eq!(scores.as_float_list().unwrap(), &[0.9, 0.4]);
    }

    #[test]
    fn test_from_json_rejects_mismatched_type() {
        let err = FieldValue::from_json(FieldType::TextList, "hypotheses", &json!("not a list"));
        assert!(matches!(err, Err(SchemaError::WrongType { .. })));

        let err = FieldValue::from_json(FieldType::Float, "quality", &json!("0.5"));
        assert!(matches!(err, Err(SchemaError::WrongType { .. })));
    }

    #[test]
    fn test_integer_json_accepted_as_float() {
        let v = FieldValue::from_json(FieldType::Float, "quality", &json!(1)).unwrap();
        assert_eq!(v.as_float(), Some(1.0));
    }

    #[test]
    fn test_emptiness() {
        assert!(FieldValue::Text("   ".to_string()).is_empty());
        assert!(FieldValue::TextList(vec![]).is_empty());
        assert!(FieldValue::TextList(vec![" ".to_string()]).is_empty());
        assert!(!FieldValue::Text("x".to_string()).is_empty());
        assert!(!FieldValue::Float(0.0).is_empty());
    }

    #[test]
    fn test_trim_text() {
        let mut v = FieldValue::Text("  padded  ".to_string());
        v.trim_text();
        assert_eq!(v.as_text(), Some("padded"));

        let mut v = FieldValue::TextList(vec![" a ".to_string(), "b".to_string()]);
        v.trim_text();
        assert_eq!(v.as_text_list().unwrap(), &["a".to_string(), "b".to_string()]);
    }
}
