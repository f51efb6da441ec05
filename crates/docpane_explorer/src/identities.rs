//! Ordered, deduplicated identity list backing the document list.

use docpane_core::DocumentIdentity;
use std::collections::HashSet;

/// Identities fetched so far, keyed by resource id, in first-seen order.
///
/// # Examples
///
/// ```
/// use docpane_core::DocumentIdentity;
/// use docpane_explorer::IdentityList;
///
/// let mut list = IdentityList::default();
/// assert!(list.push(DocumentIdentity::new("r1", "a")));
/// assert!(!list.push(DocumentIdentity::new("r1", "a-again")));
/// assert_eq!(list.len(), 1);
/// assert_eq!(list.get("r1").unwrap().id(), "a");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityList {
    entries: Vec<DocumentIdentity>,
    rids: HashSet<String>,
}

impl IdentityList {
    /// Appends an identity unless its resource id is already present.
    ///
    /// Returns whether it was appended.
    pub fn push(&mut self, identity: DocumentIdentity) -> bool {
        if !self.rids.insert(identity.rid().clone()) {
            return false;
        }
        self.entries.push(identity);
        true
    }

    /// Appends identities in order, returning those that were new.
    pub fn extend(
        &mut self,
        identities: impl IntoIterator<Item = DocumentIdentity>,
    ) -> Vec<DocumentIdentity> {
        identities
            .into_iter()
            .filter(|identity| self.push(identity.clone()))
            .collect()
    }

    /// Rewrites the public id of the entry with `rid`.
    pub fn replace_id(&mut self, rid: &str, id: impl Into<String>) -> Option<&DocumentIdentity> {
        let entry = self.entries.iter_mut().find(|entry| entry.rid() == rid)?;
        entry.set_id(id);
        Some(entry)
    }

    /// Removes the entry with `rid`.
    pub fn remove(&mut self, rid: &str) -> Option<DocumentIdentity> {
        if !self.rids.remove(rid) {
            return None;
        }
        let index = self.entries.iter().position(|entry| entry.rid() == rid)?;
        Some(self.entries.remove(index))
    }

    /// Entry with `rid`.
    pub fn get(&self, rid: &str) -> Option<&DocumentIdentity> {
        self.entries.iter().find(|entry| entry.rid() == rid)
    }

    /// Whether an entry with `rid` exists.
    pub fn contains(&self, rid: &str) -> bool {
        self.rids.contains(rid)
    }

    /// First entry.
    pub fn first(&self) -> Option<&DocumentIdentity> {
        self.entries.first()
    }

    /// Entries in display order.
    pub fn as_slice(&self) -> &[DocumentIdentity] {
        &self.entries
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentIdentity> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.rids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &IdentityList) -> Vec<&str> {
        list.iter().map(|identity| identity.rid().as_str()).collect()
    }

    #[test]
    fn extend_keeps_first_seen_order() {
        let mut list = IdentityList::default();
        list.extend([
            DocumentIdentity::new("r2", "b"),
            DocumentIdentity::new("r1", "a"),
        ]);
        let added = list.extend([
            DocumentIdentity::new("r1", "a"),
            DocumentIdentity::new("r3", "c"),
            DocumentIdentity::new("r3", "c"),
        ]);
        assert_eq!(added.len(), 1);
        assert_eq!(ids(&list), vec!["r2", "r1", "r3"]);
    }

    #[test]
    fn replace_id_touches_only_matching_entry() {
        let mut list = IdentityList::default();
        list.extend([DocumentIdentity::new("r1", "a"), DocumentIdentity::new("r2", "b")]);
        assert!(list.replace_id("r2", "b2").is_some());
        assert!(list.replace_id("r9", "x").is_none());
        assert_eq!(list.get("r1").unwrap().id(), "a");
        assert_eq!(list.get("r2").unwrap().id(), "b2");
    }

    #[test]
    fn remove_allows_readding() {
        let mut list = IdentityList::default();
        list.push(DocumentIdentity::new("r1", "a"));
        assert!(list.remove("r1").is_some());
        assert!(list.remove("r1").is_none());
        assert!(!list.contains("r1"));
        assert!(list.push(DocumentIdentity::new("r1", "a")));
    }
}
