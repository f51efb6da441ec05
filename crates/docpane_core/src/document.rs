//! Raw documents as returned by backend adapters.

use crate::{Dialect, PartitionKeyValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field carrying the partition key projection added to relational queries.
pub(crate) const PARTITION_KEY_HINT: &str = "_partitionKeyValue";

/// An opaque backend record: field names mapped to arbitrary JSON values.
///
/// # Examples
///
/// ```
/// use docpane_core::{Dialect, RawDocument};
/// use serde_json::json;
///
/// let doc = RawDocument::from_value(json!({"_rid": "r1", "_id": {"$oid": "65f0"}})).unwrap();
/// assert_eq!(doc.rid(), Some("r1"));
/// assert_eq!(doc.public_id(Dialect::DocumentProxy).as_deref(), Some("65f0"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct RawDocument(Map<String, Value>);

impl RawDocument {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Field lookup.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Removes a field.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// All fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwraps into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Copies into a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Backend resource id (`_rid`).
    pub fn rid(&self) -> Option<&str> {
        self.0.get("_rid").and_then(Value::as_str)
    }

    /// Self link (`_self`).
    pub fn self_link(&self) -> Option<&str> {
        self.0.get("_self").and_then(Value::as_str)
    }

    /// User-visible id under the dialect's id field.
    ///
    /// Document-proxy ids may be object ids (`{"$oid": "..."}`), which are
    /// reported as their hex string.
    pub fn public_id(&self, dialect: Dialect) -> Option<String> {
        match self.0.get(dialect.id_field())? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    /// Partition key values projected by the query, if the backend returned any.
    pub fn partition_key_hint(&self) -> Option<Vec<PartitionKeyValue>> {
        match self.0.get(PARTITION_KEY_HINT)? {
            Value::Array(items) => items.iter().map(PartitionKeyValue::from_scalar).collect(),
            scalar => PartitionKeyValue::from_scalar(scalar).map(|value| vec![value]),
        }
    }

    /// Editor rendering of the document for `dialect`.
    pub fn format_for_editor(&self, dialect: Dialect) -> String {
        if dialect.hides_self_link() && self.0.contains_key("_self") {
            let mut trimmed = self.0.clone();
            trimmed.remove("_self");
            format_json(&Value::Object(trimmed))
        } else {
            format_json(&Value::Object(self.0.clone()))
        }
    }
}

/// Pretty-prints JSON with four-space indentation.
///
/// # Examples
///
/// ```
/// use docpane_core::format_json;
/// use serde_json::json;
///
/// assert_eq!(format_json(&json!({"a": 1})), "{\n    \"a\": 1\n}");
/// ```
pub fn format_json(value: &Value) -> String {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buffer).unwrap_or_else(|_| value.to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Pretty printing failed, using compact form");
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> RawDocument {
        RawDocument::from_value(value).unwrap()
    }

    #[test]
    fn public_id_per_dialect() {
        let d = doc(json!({"id": "rel-1", "_id": 17}));
        assert_eq!(d.public_id(Dialect::Relational).as_deref(), Some("rel-1"));
        assert_eq!(d.public_id(Dialect::DocumentProxy).as_deref(), Some("17"));
        assert_eq!(doc(json!({"id": true})).public_id(Dialect::Relational), None);
    }

    #[test]
    fn partition_key_hint_accepts_scalar_and_array() {
        assert_eq!(
            doc(json!({"_partitionKeyValue": "books"})).partition_key_hint(),
            Some(vec![PartitionKeyValue::String("books".into())])
        );
        assert_eq!(
            doc(json!({"_partitionKeyValue": ["a", 2]})).partition_key_hint(),
            Some(vec![
                PartitionKeyValue::String("a".into()),
                PartitionKeyValue::Number(2.into())
            ])
        );
        assert_eq!(doc(json!({"_partitionKeyValue": [{"x": 1}]})).partition_key_hint(), None);
        assert_eq!(doc(json!({})).partition_key_hint(), None);
    }

    #[test]
    fn proxy_rendering_hides_self_link() {
        let d = doc(json!({"_id": "a", "_self": "dbs/x/colls/y/docs/z"}));
        assert!(!d.format_for_editor(Dialect::DocumentProxy).contains("_self"));
        assert!(d.format_for_editor(Dialect::Relational).contains("_self"));
    }

    #[test]
    fn rejects_non_objects() {
        assert!(RawDocument::from_value(json!([1, 2])).is_none());
        assert!(RawDocument::from_value(json!("x")).is_none());
    }
}
