//! Request, page and span types shared by backends and the explorer.

use derive_getters::Getters;
use docpane_core::{PartitionKeyValue, RawDocument};
use docpane_error::DocpaneError;
use serde::{Deserialize, Serialize};

/// Options passed alongside every query.
///
/// # Examples
///
/// ```
/// use docpane_interface::QueryOptions;
///
/// let options = QueryOptions::default().with_cross_partition_enabled(true);
/// assert!(*options.cross_partition_enabled());
/// assert!(options.partition_key_scope().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Whether the query may span partitions.
    cross_partition_enabled: bool,
    /// Partition value the query is scoped to.
    #[setters(strip_option)]
    partition_key_scope: Option<PartitionKeyValue>,
}

/// One page request.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct QueryRequest {
    /// Effective query text.
    query_text: String,
    /// Token to resume from (document-proxy dialect).
    continuation_token: Option<String>,
    /// Query options.
    options: QueryOptions,
    /// Whether this is the first page of a fresh result set.
    first_page: bool,
}

impl QueryRequest {
    /// Creates a request.
    pub fn new(
        query_text: impl Into<String>,
        continuation_token: Option<String>,
        options: QueryOptions,
        first_page: bool,
    ) -> Self {
        Self {
            query_text: query_text.into(),
            continuation_token,
            options,
            first_page,
        }
    }
}

/// Where a query stands after a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// More results, resumable from this token.
    Token(String),
    /// More results behind the adapter's own cursor.
    More,
    /// No more results.
    Exhausted,
}

impl Continuation {
    /// Whether the backend signalled the end of the result set.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Continuation::Exhausted)
    }

    /// The resume token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Continuation::Token(token) => Some(token),
            _ => None,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct QueryPage {
    /// Documents in backend order.
    documents: Vec<RawDocument>,
    /// Continuation state after this page.
    continuation: Continuation,
}

impl QueryPage {
    /// Creates a page.
    pub fn new(documents: Vec<RawDocument>, continuation: Continuation) -> Self {
        Self {
            documents,
            continuation,
        }
    }

    /// Splits into documents and continuation.
    pub fn into_parts(self) -> (Vec<RawDocument>, Continuation) {
        (self.documents, self.continuation)
    }
}

/// Logical action recorded on a span.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum Action {
    /// First page load of a browsing tab.
    LoadDocuments,
    /// Document create.
    CreateDocument,
    /// Document update.
    UpdateDocument,
    /// Document delete.
    DeleteDocument,
}

/// Context fields attached to every span of a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SpanContext {
    /// Database id.
    database_name: String,
    /// Container id.
    collection_name: String,
    /// Title of the owning tab.
    tab_title: String,
    /// UI area the operation came from.
    area: String,
}

impl SpanContext {
    /// Creates a context for a tab.
    pub fn new(
        database_name: impl Into<String>,
        collection_name: impl Into<String>,
        tab_title: impl Into<String>,
    ) -> Self {
        Self {
            database_name: database_name.into(),
            collection_name: collection_name.into(),
            tab_title: tab_title.into(),
            area: "Tab".to_string(),
        }
    }
}

/// Start timestamp of a span, in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SpanToken(i64);

impl SpanToken {
    /// Token stamped with the current time.
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    /// Token from a known timestamp.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Raw timestamp.
    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Milliseconds since the span started.
    pub fn elapsed_ms(&self) -> i64 {
        (chrono::Utc::now().timestamp_millis() - self.0).max(0)
    }
}

/// Failure marker carried by a failed span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct FailureDetails {
    /// Human-readable message.
    message: String,
    /// Stack trail, when available.
    stack: Option<String>,
}

impl FailureDetails {
    /// Creates failure details.
    pub fn new(message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            message: message.into(),
            stack,
        }
    }
}

impl From<&DocpaneError> for FailureDetails {
    fn from(error: &DocpaneError) -> Self {
        Self::new(error.failure_message(), error.failure_stack())
    }
}
