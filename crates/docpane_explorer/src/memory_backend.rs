//! In-memory backend adapter.
//!
//! Speaks either dialect over a vector of documents. Used by the CLI against
//! JSON fixtures and by tests as a realistic stand-in for a service: it stamps
//! system fields, detects id conflicts, pages results and can be told to fail
//! the next call.

use async_trait::async_trait;
use derive_getters::Getters;
use docpane_core::{ContainerHandle, Dialect, DocumentIdentity, PartitionKeyValue, RawDocument};
use docpane_error::{BackendError, DocpaneResult};
use docpane_interface::{Continuation, DocumentBackend, QueryPage, QueryRequest};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Snapshot of how often each backend operation was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct BackendCalls {
    /// Query calls.
    query: usize,
    /// Create calls.
    create: usize,
    /// Update calls.
    update: usize,
    /// Delete calls.
    delete: usize,
    /// Read calls.
    read: usize,
}

impl BackendCalls {
    /// Sum of all calls.
    pub fn total(&self) -> usize {
        self.query + self.create + self.update + self.delete + self.read
    }
}

#[derive(Debug, Default)]
struct CallCounters {
    query: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
    read: AtomicUsize,
}

#[derive(Debug, Default)]
struct Store {
    documents: Vec<RawDocument>,
    cursor: Option<Cursor>,
    pending_failure: Option<BackendError>,
}

#[derive(Debug)]
struct Cursor {
    query_text: String,
    offset: usize,
}

/// A backend adapter over documents held in memory.
///
/// # Examples
///
/// ```
/// use docpane_core::Dialect;
/// use docpane_explorer::InMemoryBackend;
/// use serde_json::json;
///
/// let backend = InMemoryBackend::new(Dialect::DocumentProxy)
///     .with_page_size(2)
///     .with_documents([json!({"_id": "a"}), json!({"_id": "b"})]);
/// assert_eq!(backend.documents().len(), 2);
/// assert!(backend.documents()[0].rid().is_some());
/// ```
#[derive(Debug)]
pub struct InMemoryBackend {
    dialect: Dialect,
    page_size: usize,
    store: Mutex<Store>,
    calls: CallCounters,
}

impl InMemoryBackend {
    /// Empty backend with a page size of 100.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            page_size: 100,
            store: Mutex::new(Store::default()),
            calls: CallCounters::default(),
        }
    }

    /// Sets the number of documents per page (at least one).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Adds documents, stamping system fields on those without a resource id.
    ///
    /// Values that are not JSON objects are skipped.
    pub fn with_documents(self, documents: impl IntoIterator<Item = Value>) -> Self {
        {
            let mut store = self.lock();
            for value in documents {
                match RawDocument::from_value(value) {
                    Some(mut document) => {
                        if document.rid().is_none() {
                            self.ensure_id(&mut document);
                            stamp_system_fields(&mut document, new_rid());
                        }
                        store.documents.push(document);
                    }
                    None => tracing::warn!("Skipping non-object fixture document"),
                }
            }
        }
        self
    }

    /// Makes the next call fail with `error`.
    pub fn inject_failure(&self, error: BackendError) {
        self.lock().pending_failure = Some(error);
    }

    /// Current documents in storage order.
    pub fn documents(&self) -> Vec<RawDocument> {
        self.lock().documents.clone()
    }

    /// Call counts so far.
    pub fn calls(&self) -> BackendCalls {
        BackendCalls {
            query: self.calls.query.load(Ordering::SeqCst),
            create: self.calls.create.load(Ordering::SeqCst),
            update: self.calls.update.load(Ordering::SeqCst),
            delete: self.calls.delete.load(Ordering::SeqCst),
            read: self.calls.read.load(Ordering::SeqCst),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_failure(store: &mut Store) -> DocpaneResult<()> {
        match store.pending_failure.take() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    fn ensure_id(&self, document: &mut RawDocument) {
        if document.get(self.dialect.id_field()).is_none() {
            document.insert(
                self.dialect.id_field(),
                Value::String(uuid::Uuid::new_v4().simple().to_string()),
            );
        }
    }

    fn matching(&self, store: &Store, container: &ContainerHandle, request: &QueryRequest) -> DocpaneResult<Vec<RawDocument>> {
        let predicate = Predicate::parse(self.dialect, request.query_text())?;
        let resolver = container.resolver();
        let scope = request.options().partition_key_scope().as_ref();

        let mut matches: Vec<RawDocument> = store
            .documents
            .iter()
            .filter(|document| predicate.matches(document))
            .filter(|document| match scope {
                Some(scope) => resolver
                    .extract_values(document.fields())
                    .is_some_and(|values| values.first() == Some(scope)),
                None => true,
            })
            .cloned()
            .collect();

        if let Some((field, descending)) = &predicate.order_by {
            matches.sort_by(|a, b| compare_json(lookup(a, field), lookup(b, field)));
            if *descending {
                matches.reverse();
            }
        }

        Ok(matches
            .into_iter()
            .map(|document| self.project(document, container))
            .collect())
    }

    fn project(&self, document: RawDocument, container: &ContainerHandle) -> RawDocument {
        let hint = container
            .resolver()
            .extract_values(document.fields())
            .map(|values| match values.as_slice() {
                [single] => single.to_json(),
                many => Value::Array(many.iter().map(PartitionKeyValue::to_json).collect()),
            });

        let mut projected = match self.dialect {
            Dialect::DocumentProxy => document,
            Dialect::Relational => {
                let mut projected = RawDocument::new();
                for field in ["id", "_self", "_rid", "_ts"] {
                    if let Some(value) = document.get(field) {
                        projected.insert(field, value.clone());
                    }
                }
                projected
            }
        };
        if let Some(hint) = hint {
            projected.insert("_partitionKeyValue", hint);
        }
        projected
    }

    fn position(store: &Store, identity: &DocumentIdentity) -> DocpaneResult<usize> {
        store
            .documents
            .iter()
            .position(|document| document.rid() == Some(identity.rid().as_str()))
            .ok_or_else(|| {
                BackendError::new("Entity with the specified id does not exist in the system.")
                    .into()
            })
    }

    fn conflicts(&self, store: &Store, document: &RawDocument, except_rid: Option<&str>) -> bool {
        let id = document.public_id(self.dialect);
        id.is_some()
            && store.documents.iter().any(|existing| {
                existing.rid() != except_rid && existing.public_id(self.dialect) == id
            })
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[tracing::instrument(skip(self, container, request), fields(query = %request.query_text()))]
    async fn query(
        &self,
        container: &ContainerHandle,
        request: &QueryRequest,
    ) -> DocpaneResult<QueryPage> {
        self.calls.query.fetch_add(1, Ordering::SeqCst);
        let mut store = self.lock();
        Self::take_failure(&mut store)?;

        let matches = self.matching(&store, container, request)?;

        let offset = match self.dialect {
            Dialect::DocumentProxy => match request.continuation_token() {
                Some(token) => token.parse::<usize>().map_err(|_| {
                    BackendError::new(format!("Invalid continuation token: {}", token))
                })?,
                None => 0,
            },
            Dialect::Relational => match &store.cursor {
                Some(cursor) if !request.first_page() && cursor.query_text == *request.query_text() => {
                    cursor.offset
                }
                _ => 0,
            },
        };

        let end = (offset + self.page_size).min(matches.len());
        let page: Vec<RawDocument> = matches.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
        let more = end < matches.len();

        let continuation = match (self.dialect, more) {
            (_, false) => Continuation::Exhausted,
            (Dialect::DocumentProxy, true) => Continuation::Token(end.to_string()),
            (Dialect::Relational, true) => Continuation::More,
        };
        if self.dialect == Dialect::Relational {
            store.cursor = Some(Cursor {
                query_text: request.query_text().clone(),
                offset: end,
            });
        }

        tracing::debug!(returned = page.len(), more, "Query page served");
        Ok(QueryPage::new(page, continuation))
    }

    #[tracing::instrument(skip(self, container, content))]
    async fn create(
        &self,
        container: &ContainerHandle,
        partition_key_path: Option<&str>,
        content: &Value,
    ) -> DocpaneResult<RawDocument> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let mut store = self.lock();
        Self::take_failure(&mut store)?;

        let mut document = RawDocument::from_value(content.clone())
            .ok_or_else(|| BackendError::new("Document must be a JSON object"))?;
        self.ensure_id(&mut document);
        if self.conflicts(&store, &document, None) {
            return Err(BackendError::new(
                "Entity with the specified id already exists in the system.",
            )
            .with_stack(format!(
                "create dbs/{}/colls/{}",
                container.database_id(),
                container.container_id()
            ))
            .into());
        }

        stamp_system_fields(&mut document, new_rid());
        tracing::debug!(
            partition_key_path = partition_key_path.unwrap_or("none"),
            rid = document.rid().unwrap_or_default(),
            "Document stored"
        );
        store.documents.push(document.clone());
        Ok(document)
    }

    #[tracing::instrument(skip(self, _container, identity, content), fields(rid = %identity.rid()))]
    async fn update(
        &self,
        _container: &ContainerHandle,
        identity: &DocumentIdentity,
        content: &Value,
    ) -> DocpaneResult<RawDocument> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        let mut store = self.lock();
        Self::take_failure(&mut store)?;

        let index = Self::position(&store, identity)?;
        let mut document = RawDocument::from_value(content.clone())
            .ok_or_else(|| BackendError::new("Document must be a JSON object"))?;
        self.ensure_id(&mut document);
        if self.conflicts(&store, &document, Some(identity.rid())) {
            return Err(BackendError::new(
                "Entity with the specified id already exists in the system.",
            )
            .into());
        }

        stamp_system_fields(&mut document, identity.rid().clone());
        store.documents[index] = document.clone();
        Ok(document)
    }

    #[tracing::instrument(skip(self, _container, identity), fields(rid = %identity.rid()))]
    async fn delete(
        &self,
        _container: &ContainerHandle,
        identity: &DocumentIdentity,
    ) -> DocpaneResult<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        let mut store = self.lock();
        Self::take_failure(&mut store)?;

        let index = Self::position(&store, identity)?;
        store.documents.remove(index);
        Ok(())
    }

    #[tracing::instrument(skip(self, _container, identity), fields(rid = %identity.rid()))]
    async fn read(
        &self,
        _container: &ContainerHandle,
        identity: &DocumentIdentity,
    ) -> DocpaneResult<RawDocument> {
        self.calls.read.fetch_add(1, Ordering::SeqCst);
        let mut store = self.lock();
        Self::take_failure(&mut store)?;

        let index = Self::position(&store, identity)?;
        Ok(store.documents[index].clone())
    }
}

fn new_rid() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..16].to_string()
}

fn stamp_system_fields(document: &mut RawDocument, rid: String) {
    document.insert("_self", Value::String(format!("docs/{}/", rid)));
    document.insert("_rid", Value::String(rid));
    document.insert(
        "_etag",
        Value::String(format!("\"{}\"", uuid::Uuid::new_v4().simple())),
    );
    document.insert("_ts", Value::from(chrono::Utc::now().timestamp()));
}

fn lookup<'a>(document: &'a RawDocument, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(document.get(first)?, |value, segment| value.as_object()?.get(segment))
}

fn compare_json(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

/// Equality filter understood by the in-memory backend.
#[derive(Debug, Default)]
struct Predicate {
    equals: Vec<(Vec<String>, Value)>,
    order_by: Option<(Vec<String>, bool)>,
}

impl Predicate {
    fn matches(&self, document: &RawDocument) -> bool {
        self.equals
            .iter()
            .all(|(path, expected)| lookup(document, path) == Some(expected))
    }

    fn parse(dialect: Dialect, query_text: &str) -> DocpaneResult<Self> {
        match dialect {
            Dialect::DocumentProxy => Self::parse_proxy(query_text),
            Dialect::Relational => Self::parse_relational(query_text),
        }
    }

    /// `{}` or `{"field": value, "a.b": value}` with scalar values.
    fn parse_proxy(query_text: &str) -> DocpaneResult<Self> {
        let filter: Map<String, Value> = serde_json::from_str(query_text).map_err(|e| {
            BackendError::new(format!("Unsupported filter {}: {}", query_text, e))
        })?;
        let mut predicate = Self::default();
        for (field, value) in filter {
            if value.is_object() || value.is_array() {
                return Err(BackendError::new(format!(
                    "Unsupported operator filter on field {}",
                    field
                ))
                .into());
            }
            predicate
                .equals
                .push((field.split('.').map(str::to_string).collect(), value));
        }
        Ok(predicate)
    }

    /// `select ... from c [WHERE c.a = v [AND c.b = v]...] [ORDER BY c.f [ASC|DESC]]`.
    fn parse_relational(query_text: &str) -> DocpaneResult<Self> {
        let lower = query_text.to_ascii_lowercase();
        let clause_start = lower
            .find(" from c")
            .map(|index| index + " from c".len())
            .ok_or_else(|| BackendError::new(format!("Unsupported query: {}", query_text)))?;
        let clauses = query_text[clause_start..].trim();
        let lower_clauses = clauses.to_ascii_lowercase();

        let (where_part, order_part) = match lower_clauses.find("order by") {
            Some(index) => (clauses[..index].trim(), Some(clauses[index + "order by".len()..].trim())),
            None => (clauses, None),
        };

        let mut predicate = Self::default();
        if !where_part.is_empty() {
            let conditions = strip_keyword(where_part, "where").ok_or_else(|| {
                BackendError::new(format!("Unsupported clause: {}", where_part))
            })?;
            for condition in split_keyword(conditions, "and") {
                let (left, right) = condition.split_once('=').ok_or_else(|| {
                    BackendError::new(format!("Unsupported condition: {}", condition))
                })?;
                let path = container_path(left.trim())?;
                let value: Value = serde_json::from_str(right.trim()).map_err(|e| {
                    BackendError::new(format!("Unsupported literal {}: {}", right.trim(), e))
                })?;
                predicate.equals.push((path, value));
            }
        }

        if let Some(order) = order_part {
            let mut words = order.split_whitespace();
            let field = words
                .next()
                .ok_or_else(|| BackendError::new("ORDER BY needs a field"))?;
            let descending = words
                .next()
                .is_some_and(|direction| direction.eq_ignore_ascii_case("desc"));
            predicate.order_by = Some((container_path(field)?, descending));
        }
        Ok(predicate)
    }
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| text[keyword.len()..].trim())
}

fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let lower = text.to_ascii_lowercase();
    let needle = format!(" {} ", keyword);
    let mut parts = Vec::new();
    let mut start = 0;
    while let Some(found) = lower[start..].find(&needle) {
        parts.push(text[start..start + found].trim());
        start += found + needle.len();
    }
    parts.push(text[start..].trim());
    parts
}

fn container_path(expression: &str) -> DocpaneResult<Vec<String>> {
    let path = expression
        .strip_prefix("c.")
        .ok_or_else(|| BackendError::new(format!("Unsupported field reference: {}", expression)))?;
    Ok(path.split('.').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn relational_where_and_order() {
        let predicate = Predicate::parse_relational(
            "select c.id, c._self, c._rid, c._ts from c WHERE c.category = \"books\" AND c.meta.rank = 2 ORDER BY c._ts DESC",
        )
        .unwrap();
        assert_eq!(predicate.equals.len(), 2);
        assert_eq!(predicate.equals[1].0, vec!["meta".to_string(), "rank".to_string()]);
        assert_eq!(predicate.order_by, Some((vec!["_ts".to_string()], true)));
    }

    #[test]
    fn proxy_operator_filters_are_rejected() {
        assert!(Predicate::parse_proxy("{}").unwrap().equals.is_empty());
        assert!(Predicate::parse_proxy("{\"qty\": {\"$gte\": 20}}").is_err());
        assert!(Predicate::parse_proxy("{ qty: 1 }").is_err());
    }

    #[test]
    fn predicate_walks_nested_fields() {
        let predicate = Predicate::parse_proxy("{\"address.city\": \"Oslo\"}").unwrap();
        let oslo = RawDocument::from_value(json!({"address": {"city": "Oslo"}})).unwrap();
        let bergen = RawDocument::from_value(json!({"address": {"city": "Bergen"}})).unwrap();
        assert!(predicate.matches(&oslo));
        assert!(!predicate.matches(&bergen));
    }

    #[tokio::test]
    async fn create_with_shard_key_path_stores_document() {
        let backend = InMemoryBackend::new(Dialect::DocumentProxy);
        let container = ContainerHandle::new("store", "products", Dialect::DocumentProxy);

        let created = backend
            .create(&container, Some("category"), &json!({"_id": "a", "category": "books"}))
            .await
            .unwrap();

        assert!(created.rid().is_some());
        assert_eq!(backend.documents(), vec![created]);
        assert_eq!(*backend.calls().create(), 1);
    }
}
