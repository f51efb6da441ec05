//! Backend adapter and collaborator traits.

use crate::{Action, FailureDetails, QueryPage, QueryRequest, SpanContext, SpanToken};
use async_trait::async_trait;
use docpane_core::{ContainerHandle, Dialect, DocumentIdentity, RawDocument};
use docpane_error::DocpaneResult;
use serde_json::Value;

/// A backend adapter for one dialect.
///
/// Adapters report failures as [`docpane_error::BackendError`] wrapped in
/// [`docpane_error::DocpaneError`]; the explorer reads the message and stack
/// back out for notifications and failure spans.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Dialect this adapter speaks.
    fn dialect(&self) -> Dialect;

    /// Runs one page of a query.
    ///
    /// Relational adapters keep their own cursor: `request.first_page()` tells
    /// them to restart it, otherwise they continue where the last page ended.
    /// Document-proxy adapters resume from `request.continuation_token()`.
    async fn query(
        &self,
        container: &ContainerHandle,
        request: &QueryRequest,
    ) -> DocpaneResult<QueryPage>;

    /// Creates a document and returns the stored record.
    async fn create(
        &self,
        container: &ContainerHandle,
        partition_key_path: Option<&str>,
        content: &Value,
    ) -> DocpaneResult<RawDocument>;

    /// Replaces the document identified by `identity`.
    async fn update(
        &self,
        container: &ContainerHandle,
        identity: &DocumentIdentity,
        content: &Value,
    ) -> DocpaneResult<RawDocument>;

    /// Deletes the document identified by `identity`.
    async fn delete(
        &self,
        container: &ContainerHandle,
        identity: &DocumentIdentity,
    ) -> DocpaneResult<()>;

    /// Reads the full document identified by `identity`.
    async fn read(
        &self,
        container: &ContainerHandle,
        identity: &DocumentIdentity,
    ) -> DocpaneResult<RawDocument>;
}

/// Sink for operation spans.
///
/// Every span is opened with [`span_start`](Self::span_start) and closed exactly
/// once with either [`span_success`](Self::span_success) or
/// [`span_failure`](Self::span_failure).
pub trait Instrumentation: Send + Sync {
    /// Opens a span.
    fn span_start(&self, action: Action, context: &SpanContext) -> SpanToken;

    /// Closes a span as successful.
    fn span_success(&self, action: Action, context: &SpanContext, token: SpanToken);

    /// Closes a span as failed.
    fn span_failure(
        &self,
        action: Action,
        context: &SpanContext,
        token: SpanToken,
        failure: &FailureDetails,
    );
}

/// Interactive yes/no prompt.
pub trait Confirm: Send + Sync {
    /// Returns `true` if the user accepts.
    fn confirm(&self, message: &str) -> bool;
}

/// Blocking error notification.
pub trait Notify: Send + Sync {
    /// Shows a backend failure to the user.
    fn notify_error(&self, message: &str);
}
