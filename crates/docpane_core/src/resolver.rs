//! Partition key resolution for raw documents.
//!
//! The resolver is the only place that knows about wrapper-encoded key paths:
//! it canonicalizes the container definition once and every later question
//! (which values does this document carry, is the shard key present, what is
//! the key called) is answered against the canonical paths.

use crate::partition_key::{PartitionKeyDefinition, PartitionKeyValue, canonicalize, path_segments};
use derive_getters::Getters;
use serde_json::{Map, Value};

/// Walks every canonical path of `definition` into `document`.
///
/// Returns `None` when the definition has no paths, or when a path is missing
/// (or holds an object or array) and the key is not optional. Optional
/// (system) keys report missing paths as [`PartitionKeyValue::Undefined`].
///
/// # Examples
///
/// ```
/// use docpane_core::{PartitionKeyDefinition, PartitionKeyValue, extract_values};
/// use serde_json::json;
///
/// let def = PartitionKeyDefinition::single("/address/city");
/// let doc = json!({"id": "1", "address": {"city": "Oslo"}});
/// assert_eq!(
///     extract_values(doc.as_object().unwrap(), &def),
///     Some(vec![PartitionKeyValue::String("Oslo".into())])
/// );
///
/// let doc = json!({"id": "2"});
/// assert_eq!(extract_values(doc.as_object().unwrap(), &def), None);
/// ```
pub fn extract_values(
    document: &Map<String, Value>,
    definition: &PartitionKeyDefinition,
) -> Option<Vec<PartitionKeyValue>> {
    let definition = canonicalize(definition);
    if definition.paths().is_empty() {
        return None;
    }

    let mut values = Vec::with_capacity(definition.paths().len());
    for path in definition.paths() {
        match lookup(document, path).and_then(PartitionKeyValue::from_scalar) {
            Some(value) => values.push(value),
            None if *definition.system_key() => values.push(PartitionKeyValue::Undefined),
            None => return None,
        }
    }
    Some(values)
}

/// Whether `document` carries a non-null value for every key path.
pub fn has_shard_key(document: &Map<String, Value>, definition: &PartitionKeyDefinition) -> bool {
    extract_values(document, definition)
        .is_some_and(|values| values.iter().all(|value| !value.is_missing()))
}

/// Whether the definition enables large partition key values.
pub fn is_extended_key_enabled(definition: &PartitionKeyDefinition) -> bool {
    *definition.version() >= 2
}

fn lookup<'a>(document: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path_segments(path).into_iter();
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Partition key rules of one container, canonicalized once.
///
/// # Examples
///
/// ```
/// use docpane_core::{PartitionKeyDefinition, PartitionKeyResolver};
/// use serde_json::json;
///
/// let raw = PartitionKeyDefinition::single("$v.shard.$v.key.$v");
/// let resolver = PartitionKeyResolver::new(Some(&raw));
/// assert_eq!(resolver.shard_key_property().as_deref(), Some("shard.key"));
///
/// let doc = json!({"_id": "a1", "shard": {"key": 3}});
/// assert!(resolver.has_shard_key(doc.as_object().unwrap()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct PartitionKeyResolver {
    /// Canonical definition, or `None` for containers without a partition key.
    definition: Option<PartitionKeyDefinition>,
}

impl PartitionKeyResolver {
    /// Creates a resolver from the container's raw definition.
    pub fn new(definition: Option<&PartitionKeyDefinition>) -> Self {
        let definition = definition
            .map(canonicalize)
            .filter(|definition| !definition.paths().is_empty());
        Self { definition }
    }

    /// See [`extract_values`].
    pub fn extract_values(&self, document: &Map<String, Value>) -> Option<Vec<PartitionKeyValue>> {
        self.definition
            .as_ref()
            .and_then(|definition| extract_values(document, definition))
    }

    /// See [`has_shard_key`].
    pub fn has_shard_key(&self, document: &Map<String, Value>) -> bool {
        self.definition
            .as_ref()
            .is_some_and(|definition| has_shard_key(document, definition))
    }

    /// See [`is_extended_key_enabled`].
    pub fn is_extended_key_enabled(&self) -> bool {
        self.definition.as_ref().is_some_and(is_extended_key_enabled)
    }

    /// Whether new documents must carry the key: the container is partitioned
    /// and the key is not system managed.
    pub fn requires_shard_key(&self) -> bool {
        self.definition
            .as_ref()
            .is_some_and(|definition| !definition.system_key())
    }

    /// First key path in dotted property form (`/shard/key` becomes `shard.key`).
    pub fn shard_key_property(&self) -> Option<String> {
        let path = self.definition.as_ref()?.paths().first()?;
        Some(path_segments(path).join("."))
    }

    /// First key path as a slash path, used as the list column header.
    pub fn partition_key_header(&self) -> Option<String> {
        self.shard_key_property()
            .map(|property| format!("/{}", property.replace('.', "/")))
    }

    /// Canonical key paths, empty for unpartitioned containers.
    pub fn paths(&self) -> &[String] {
        self.definition
            .as_ref()
            .map(|definition| definition.paths().as_slice())
            .unwrap_or(&[])
    }

    /// Advisory text shown for large partition key containers.
    pub fn extended_key_advisory(&self) -> Option<&'static str> {
        self.is_extended_key_enabled()
            .then_some("Large partition key is enabled: key values up to 2 KB are hashed in full.")
    }
}
