//! Backend dialects and their static presentation rules.

use serde::{Deserialize, Serialize};

/// The API flavour a container is reached through.
///
/// The dialect decides the public id field, the new-document template and
/// the wording of prompts. Everything that talks to the network goes through a
/// backend adapter instead.
///
/// # Examples
///
/// ```
/// use docpane_core::Dialect;
/// use std::str::FromStr;
///
/// assert_eq!(Dialect::from_str("mongo").unwrap(), Dialect::DocumentProxy);
/// assert_eq!(Dialect::DocumentProxy.id_field(), "_id");
/// assert_eq!(Dialect::Relational.to_string(), "relational");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Dialect {
    /// SQL-style query API; pagination is driven by the adapter's own cursor.
    #[strum(to_string = "relational", serialize = "sql")]
    #[serde(rename = "relational", alias = "sql")]
    Relational,
    /// Document-store proxy API; pagination uses opaque continuation tokens.
    #[strum(to_string = "document-proxy", serialize = "mongo")]
    #[serde(rename = "document-proxy", alias = "mongo")]
    DocumentProxy,
}

impl Dialect {
    /// Field holding the user-visible document id.
    pub fn id_field(&self) -> &'static str {
        match self {
            Dialect::Relational => "id",
            Dialect::DocumentProxy => "_id",
        }
    }

    /// Content placed in the editor when composing a new document.
    pub fn new_document_template(&self) -> String {
        format!(
            "{{ \n \"{}\": \"replace_with_new_document_id\" \n }}",
            self.id_field()
        )
    }

    /// Label of the "new document" command.
    pub fn new_document_label(&self) -> &'static str {
        match self {
            Dialect::Relational => "New Item",
            Dialect::DocumentProxy => "New Document",
        }
    }

    /// Prompt shown before a delete is sent to the backend.
    pub fn delete_confirmation(&self) -> &'static str {
        match self {
            Dialect::Relational => "Are you sure you want to delete the selected item?",
            Dialect::DocumentProxy => "Are you sure you want to delete the selected document?",
        }
    }

    /// Match-all filter used when the filter box is empty.
    pub fn default_filter(&self) -> &'static str {
        match self {
            Dialect::Relational => "",
            Dialect::DocumentProxy => "{}",
        }
    }

    /// Placeholder text for the filter box.
    pub fn filter_placeholder(&self) -> &'static str {
        match self {
            Dialect::Relational => {
                "Type a query predicate (e.g., WHERE c.id=\"1\"), or choose one from the drop down list, or leave empty to query all documents."
            }
            Dialect::DocumentProxy => {
                "Type a query predicate (e.g., {\"a\":\"foo\"}), or choose one from the drop down list, or leave empty to query all documents."
            }
        }
    }

    /// Canned filters offered under the filter box.
    pub fn filter_suggestions(&self) -> &'static [&'static str] {
        match self {
            Dialect::Relational => &[
                "WHERE c.id = \"foo\"",
                "ORDER BY c._ts DESC",
                "WHERE c.id = \"foo\" ORDER BY c._ts DESC",
            ],
            Dialect::DocumentProxy => &["{\"id\": \"foo\"}", "{ qty: { $gte: 20 } }"],
        }
    }

    /// One-line summary of the active filter, shown when the filter box is collapsed.
    pub fn filter_summary(&self, filter: &str) -> String {
        let filter = filter.trim();
        match self {
            Dialect::Relational if filter.is_empty() => "SELECT * FROM c".to_string(),
            Dialect::Relational => format!("SELECT * FROM c {}", filter),
            Dialect::DocumentProxy if filter.is_empty() => "No filter applied".to_string(),
            Dialect::DocumentProxy => format!("Filter : {}", filter),
        }
    }

    /// Whether new documents must carry the container's shard key before they
    /// are sent. Relational containers accept documents without one.
    pub fn requires_shard_key_on_create(&self) -> bool {
        matches!(self, Dialect::DocumentProxy)
    }

    /// Whether the editor rendering hides the `_self` link.
    pub fn hides_self_link(&self) -> bool {
        matches!(self, Dialect::DocumentProxy)
    }
}
