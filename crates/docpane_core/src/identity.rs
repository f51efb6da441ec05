//! Rows of the document list.

use crate::{Dialect, PartitionKeyResolver, PartitionKeyValue, RawDocument};
use derive_getters::Getters;
use serde::Serialize;

/// One row of the browsing list.
///
/// The resource id is the identity key: it is stable across updates and unique
/// within a container. The public id may be rewritten by an update; partition
/// values never change once a document exists.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdentity {
    /// Backend resource id (`_rid`).
    rid: String,
    /// User-visible id; empty when the document has none.
    id: String,
    /// Self link, when the backend reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    self_link: Option<String>,
    /// One value per partition key path, absent for unpartitioned containers.
    #[serde(skip_serializing_if = "Option::is_none")]
    partition_key_values: Option<Vec<PartitionKeyValue>>,
}

impl DocumentIdentity {
    /// Identity with only a resource id and public id.
    pub fn new(rid: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            rid: rid.into(),
            id: id.into(),
            self_link: None,
            partition_key_values: None,
        }
    }

    /// Sets the self link.
    pub fn with_self_link(mut self, self_link: impl Into<String>) -> Self {
        self.self_link = Some(self_link.into());
        self
    }

    /// Sets the partition key values.
    pub fn with_partition_key_values(mut self, values: Vec<PartitionKeyValue>) -> Self {
        self.partition_key_values = Some(values);
        self
    }

    /// Replaces the public id after an update rewrote it.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Partition key cell text: values joined with `, `, empty when absent.
    pub fn partition_key_display(&self) -> String {
        self.partition_key_values
            .as_ref()
            .map(|values| {
                values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }

    /// Resolves the identity of a raw document.
    ///
    /// Returns `None` when the document has no resource id. Partition values
    /// come from the query's projection hint when present, otherwise from the
    /// resolver.
    ///
    /// # Examples
    ///
    /// ```
    /// use docpane_core::{
    ///     Dialect, DocumentIdentity, PartitionKeyDefinition, PartitionKeyResolver, RawDocument,
    /// };
    /// use serde_json::json;
    ///
    /// let resolver = PartitionKeyResolver::new(Some(&PartitionKeyDefinition::single("/category")));
    /// let raw = RawDocument::from_value(json!({"_rid": "r1", "id": "a", "category": "books"})).unwrap();
    /// let identity = DocumentIdentity::resolve(&raw, Dialect::Relational, &resolver).unwrap();
    /// assert_eq!(identity.rid(), "r1");
    /// assert_eq!(identity.partition_key_display(), "books");
    /// ```
    pub fn resolve(
        raw: &RawDocument,
        dialect: Dialect,
        resolver: &PartitionKeyResolver,
    ) -> Option<Self> {
        let rid = raw.rid()?;
        let partition_key_values = raw
            .partition_key_hint()
            .or_else(|| resolver.extract_values(raw.fields()));

        Some(Self {
            rid: rid.to_string(),
            id: raw.public_id(dialect).unwrap_or_default(),
            self_link: raw.self_link().map(str::to_string),
            partition_key_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PartitionKeyDefinition;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawDocument {
        RawDocument::from_value(value).unwrap()
    }

    #[test]
    fn document_without_rid_is_untracked() {
        let resolver = PartitionKeyResolver::default();
        assert!(DocumentIdentity::resolve(&raw(json!({"id": "a"})), Dialect::Relational, &resolver).is_none());
    }

    #[test]
    fn hint_wins_over_document_fields() {
        let resolver = PartitionKeyResolver::new(Some(&PartitionKeyDefinition::single("/category")));
        let doc = raw(json!({"_rid": "r1", "id": "a", "category": "books", "_partitionKeyValue": "music"}));
        let identity = DocumentIdentity::resolve(&doc, Dialect::Relational, &resolver).unwrap();
        assert_eq!(
            identity.partition_key_values(),
            &Some(vec![PartitionKeyValue::String("music".into())])
        );
    }

    #[test]
    fn proxy_identity_uses_underscore_id() {
        let resolver = PartitionKeyResolver::default();
        let doc = raw(json!({"_rid": "r9", "_id": "a1", "id": "ignored", "_self": "docs/r9"}));
        let identity = DocumentIdentity::resolve(&doc, Dialect::DocumentProxy, &resolver).unwrap();
        assert_eq!(identity.id(), "a1");
        assert_eq!(identity.self_link().as_deref(), Some("docs/r9"));
        assert_eq!(identity.partition_key_values(), &None);
    }

    #[test]
    fn multi_value_display() {
        let identity = DocumentIdentity::new("r", "i").with_partition_key_values(vec![
            PartitionKeyValue::String("a".into()),
            PartitionKeyValue::Number(3.into()),
        ]);
        assert_eq!(identity.partition_key_display(), "a, 3");
    }
}
