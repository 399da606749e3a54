//! Tagged value model for resume records.
//!
//! The server returns resumes as loosely-shaped JSON. Everything the renderer
//! and the form populator need is expressed by three shapes: a scalar, a
//! nested record, or an ordered sequence of values.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number};

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Scalar {
    /// Text shown for this scalar, if it is displayable.
    ///
    /// Only text and numbers are displayable; null and booleans are not.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::Null | Scalar::Bool(_) => None,
        }
    }

    /// Whether this scalar counts as "no value" (null or empty string).
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(s) => s.is_empty(),
            Scalar::Bool(_) | Scalar::Number(_) => false,
        }
    }
}

/// A resume value: a scalar, a nested record, or a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Record(Record),
    Sequence(Vec<Value>),
}

impl Value {
    /// Whether the value is null, an empty string, or an empty container.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_blank(),
            Value::Record(r) => r.is_empty(),
            Value::Sequence(items) => items.is_empty(),
        }
    }

    /// Text written into a form control for this value.
    ///
    /// Sequences of scalars become one line per item; nested records are
    /// shown as compact JSON.
    pub fn to_form_text(&self) -> String {
        match self {
            Value::Scalar(Scalar::Null) => String::new(),
            Value::Scalar(Scalar::Bool(b)) => b.to_string(),
            Value::Scalar(Scalar::Number(n)) => n.to_string(),
            Value::Scalar(Scalar::Text(s)) => s.clone(),
            Value::Sequence(items) => items
                .iter()
                .map(Value::to_form_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Record(r) => serde_json::Value::from(r.clone()).to_string(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Value::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Value::Scalar(Scalar::Text(s)),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(Record::from(map)),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(Scalar::Null) => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(b),
            Value::Scalar(Scalar::Number(n)) => serde_json::Value::Number(n),
            Value::Scalar(Scalar::Text(s)) => serde_json::Value::String(s),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Record(r) => r.into(),
        }
    }
}

/// An ordered mapping from field name to value.
///
/// Field order is the order the server sent them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing any existing field of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Look up a field by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, serde_json::Value>> for Record {
    fn from(map: Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
        }
    }
}

impl From<Record> for serde_json::Value {
    fn from(record: Record) -> Self {
        let map: Map<String, serde_json::Value> = record
            .fields
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl TryFrom<serde_json::Value> for Record {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Record::from(map)),
            other => Err(format!("expected a JSON object, got {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Record::from(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_preserves_server_order() {
        let record =
            Record::try_from(json!({"zeta": 1, "alpha": 2, "mid": 3})).unwrap();
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_try_from_non_object_fails() {
        let err = Record::try_from(json!([1, 2])).unwrap_err();
        assert!(err.contains("expected a JSON object"));
    }

    #[test]
    fn test_deserialize_record() {
        let record: Record = serde_json::from_str(r#"{"first_name":"Ana","skills":[]}"#).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(
            record.get("first_name"),
            Some(&Value::Scalar(Scalar::Text("Ana".to_string())))
        );
    }

    #[test]
    fn test_value_is_empty() {
        assert!(Value::from(json!(null)).is_empty());
        assert!(Value::from(json!("")).is_empty());
        assert!(Value::from(json!([])).is_empty());
        assert!(Value::from(json!({})).is_empty());
        assert!(!Value::from(json!(0)).is_empty());
        assert!(!Value::from(json!(false)).is_empty());
        assert!(!Value::from(json!("x")).is_empty());
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Scalar::Text("a".into()).display_text(), Some("a".to_string()));
        assert_eq!(
            Scalar::Number(Number::from(2024)).display_text(),
            Some("2024".to_string())
        );
        assert_eq!(Scalar::Bool(true).display_text(), None);
        assert_eq!(Scalar::Null.display_text(), None);
    }

    #[test]
    fn test_to_form_text_joins_sequences() {
        let value = Value::from(json!(["first", "second"]));
        assert_eq!(value.to_form_text(), "first\nsecond");
    }

    #[test]
    fn test_to_form_text_record_is_json() {
        let value = Value::from(json!({"a": 1}));
        assert_eq!(value.to_form_text(), r#"{"a":1}"#);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = Record::new();
        record.insert("a", Value::from(json!(1)));
        record.insert("b", Value::from(json!(2)));
        record.insert("a", Value::from(json!(3)));
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::from(json!(3))));
    }
}
