//! Partition key definitions, values and wrapper canonicalization.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Marker token interleaved with field names by the document-proxy schema
/// (`/"$v"/"shard"/"$v"/"key"/"$v"` stands for `/shard/key`).
pub const WRAPPER_MARKER: &str = "$v";

/// Shape of a partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartitionKeyKind {
    /// A single path.
    #[default]
    Hash,
    /// Several paths forming a hierarchical key.
    MultiHash,
}

/// A container's partition key definition as reported by the backend.
///
/// # Examples
///
/// ```
/// use docpane_core::{PartitionKeyDefinition, PartitionKeyKind};
///
/// let def: PartitionKeyDefinition =
///     serde_json::from_str(r#"{"paths": ["/category"], "version": 2}"#).unwrap();
/// assert_eq!(def.paths(), &vec!["/category".to_string()]);
/// assert_eq!(*def.kind(), PartitionKeyKind::Hash);
/// assert_eq!(*def.version(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct PartitionKeyDefinition {
    /// Ordered key paths, e.g. `/category`.
    paths: Vec<String>,

    /// Single or multi-path key.
    #[serde(default)]
    #[builder(default)]
    kind: PartitionKeyKind,

    /// Definition version; 2 enables large partition key values.
    #[serde(default = "default_version")]
    #[builder(default = "default_version()")]
    version: u8,

    /// System-managed key of a migrated non-partitioned container. Documents
    /// are not required to carry it.
    #[serde(default)]
    #[builder(default)]
    system_key: bool,
}

fn default_version() -> u8 {
    1
}

impl PartitionKeyDefinition {
    /// Creates a builder.
    pub fn builder() -> PartitionKeyDefinitionBuilder {
        PartitionKeyDefinitionBuilder::default()
    }

    /// Version 1 definition over a single path.
    pub fn single(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
            kind: PartitionKeyKind::Hash,
            version: default_version(),
            system_key: false,
        }
    }

    /// Whether any path still carries wrapper marker tokens.
    pub fn is_wrapped(&self) -> bool {
        self.paths.iter().any(|path| path.contains(WRAPPER_MARKER))
    }
}

/// Rewrites wrapper-encoded paths into plain slash paths.
///
/// Paths without the marker are left alone, so applying this twice gives the
/// same result as applying it once.
///
/// # Examples
///
/// ```
/// use docpane_core::{PartitionKeyDefinition, canonicalize};
///
/// let wrapped = PartitionKeyDefinition::single(r#"/"$v"/"shard"/"$v"/"key"/"$v""#);
/// let plain = canonicalize(&wrapped);
/// assert_eq!(plain.paths(), &vec!["/shard/key".to_string()]);
/// assert_eq!(canonicalize(&plain), plain);
/// ```
pub fn canonicalize(definition: &PartitionKeyDefinition) -> PartitionKeyDefinition {
    if !definition.is_wrapped() {
        return definition.clone();
    }

    let paths = definition
        .paths
        .iter()
        .map(|path| {
            if path.contains(WRAPPER_MARKER) {
                unwrap_path(path)
            } else {
                path.clone()
            }
        })
        .collect();

    tracing::debug!(original = ?definition.paths, canonical = ?paths, "Canonicalized wrapped partition key");

    PartitionKeyDefinition {
        paths,
        ..definition.clone()
    }
}

fn unwrap_path(path: &str) -> String {
    // Slash form comes from the definition itself, dotted form from the
    // shard key property the proxy reports.
    let separator = if path.starts_with('/') { '/' } else { '.' };
    let segments: Vec<&str> = path
        .split(separator)
        .map(|segment| segment.trim_matches('"'))
        .filter(|segment| !segment.is_empty() && *segment != WRAPPER_MARKER)
        .collect();
    format!("/{}", segments.join("/"))
}

/// Splits a canonical path into the field names it walks.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    path.split('/')
        .map(|segment| segment.trim_matches('"'))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// One scalar component of a document's partition key.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum PartitionKeyValue {
    /// Explicit JSON `null`.
    #[display("null")]
    Null,
    /// Boolean value.
    #[display("{}", _0)]
    Bool(bool),
    /// Numeric value.
    #[display("{}", _0)]
    Number(serde_json::Number),
    /// String value.
    #[display("{}", _0)]
    String(String),
    /// The path is absent from a document in a container whose key is optional.
    #[display("")]
    Undefined,
}

impl PartitionKeyValue {
    /// Converts a JSON scalar. Objects and arrays are not valid key values.
    pub fn from_scalar(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// JSON form sent to backends. `Undefined` is encoded as an empty object.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Undefined => Value::Object(serde_json::Map::new()),
        }
    }

    /// Whether this component is null or undefined.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }
}

impl From<&str> for PartitionKeyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl Serialize for PartitionKeyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PartitionKeyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Object(map) if map.is_empty() => Ok(Self::Undefined),
            _ => Self::from_scalar(&value).ok_or_else(|| {
                serde::de::Error::custom("partition key values must be scalars")
            }),
        }
    }
}
