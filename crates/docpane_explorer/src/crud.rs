//! Create, update, delete and read orchestration.

use crate::{EditorSession, IdentityList, OperationSpan, TabStatus};
use docpane_core::{ContainerHandle, Dialect, DocumentIdentity, PartitionKeyResolver};
use docpane_error::{
    BackendError, DocpaneError, DocpaneErrorKind, DocpaneResult, ValidationError,
    ValidationErrorKind,
};
use docpane_interface::{Action, Confirm, DocumentBackend, Instrumentation, Notify, SpanContext};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Prompt shown before unsaved edits are thrown away.
pub const DISCARD_CONFIRMATION: &str = "Your unsaved changes will be lost.";

/// Collaborators the explorer calls out to.
#[derive(Clone)]
pub struct Collaborators {
    /// Span sink.
    pub instrumentation: Arc<dyn Instrumentation>,
    /// Yes/no prompt.
    pub confirm: Arc<dyn Confirm>,
    /// Error notification.
    pub notify: Arc<dyn Notify>,
}

impl Collaborators {
    /// Bundles collaborators.
    pub fn new(
        instrumentation: Arc<dyn Instrumentation>,
        confirm: Arc<dyn Confirm>,
        notify: Arc<dyn Notify>,
    ) -> Self {
        Self {
            instrumentation,
            confirm,
            notify,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Tab state an operation writes back to on completion.
#[derive(Debug)]
pub struct EditTarget<'a> {
    /// Fetched identities.
    pub identities: &'a mut IdentityList,
    /// Editor session.
    pub editor: &'a mut EditorSession,
    /// Status flags.
    pub status: &'a mut TabStatus,
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The document was deleted.
    Deleted(DocumentIdentity),
    /// The user declined the confirmation; nothing happened.
    Declined,
}

/// Result of a selection request.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The document is now shown.
    Selected(DocumentIdentity),
    /// The user kept their unsaved edits; nothing happened.
    Declined,
}

/// Wraps backend writes in validation, spans and state updates.
///
/// Validation failures never reach the backend and open no span: they are
/// written to the inline error and returned. Backend failures close the span
/// as failed, are shown through [`Notify`], set the execution error flag and
/// are returned to the caller. The executing flag is cleared on every path.
#[derive(Clone)]
pub struct CrudOrchestrator {
    container: ContainerHandle,
    resolver: PartitionKeyResolver,
    backend: Arc<dyn DocumentBackend>,
    collaborators: Collaborators,
    span_context: SpanContext,
}

impl std::fmt::Debug for CrudOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudOrchestrator")
            .field("container", &self.container)
            .field("backend", &self.backend.dialect())
            .field("span_context", &self.span_context)
            .finish_non_exhaustive()
    }
}

impl CrudOrchestrator {
    /// Creates an orchestrator for `container`.
    pub fn new(
        container: ContainerHandle,
        backend: Arc<dyn DocumentBackend>,
        collaborators: Collaborators,
        span_context: SpanContext,
    ) -> Self {
        if backend.dialect() != *container.dialect() {
            tracing::warn!(
                container = %container.dialect(),
                backend = %backend.dialect(),
                "Backend dialect differs from container dialect"
            );
        }
        let resolver = container.resolver();
        Self {
            container,
            resolver,
            backend,
            collaborators,
            span_context,
        }
    }

    /// Container operated on.
    pub fn container(&self) -> &ContainerHandle {
        &self.container
    }

    /// Partition key resolver of the container.
    pub fn resolver(&self) -> &PartitionKeyResolver {
        &self.resolver
    }

    /// Backend adapter.
    pub fn backend(&self) -> &Arc<dyn DocumentBackend> {
        &self.backend
    }

    /// Collaborators.
    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Context attached to every span.
    pub fn span_context(&self) -> &SpanContext {
        &self.span_context
    }

    fn dialect(&self) -> Dialect {
        *self.container.dialect()
    }

    /// Creates a document from editor content.
    #[tracing::instrument(
        skip(self, content, target),
        fields(database = %self.container.database_id(), container = %self.container.container_id())
    )]
    pub async fn create(
        &self,
        content: &str,
        target: EditTarget<'_>,
    ) -> DocpaneResult<DocumentIdentity> {
        target.status.reset_errors();
        let document = match self.validate_new(content) {
            Ok(document) => document,
            Err(error) => return Err(self.reject(target.status, error)),
        };

        target.status.set_executing(true);
        let span = OperationSpan::start(
            self.collaborators.instrumentation.as_ref(),
            Action::CreateDocument,
            &self.span_context,
        );
        let dialect = self.dialect();
        let partition_key_path = self.resolver.shard_key_property();
        let result = self
            .backend
            .create(&self.container, partition_key_path.as_deref(), &Value::Object(document))
            .await
            .and_then(|raw| -> DocpaneResult<_> {
                let identity = DocumentIdentity::resolve(&raw, dialect, &self.resolver)
                    .ok_or_else(|| BackendError::new("Created document has no resource id"))?;
                Ok((raw, identity))
            });

        match result {
            Ok((raw, identity)) => {
                target.identities.push(identity.clone());
                target
                    .editor
                    .save_succeeded(identity.clone(), raw.format_for_editor(dialect));
                target.status.set_executing(false);
                span.succeed();
                tracing::info!(rid = %identity.rid(), id = %identity.id(), "Document created");
                Ok(identity)
            }
            Err(error) => Err(self.backend_failed(target.status, span, error)),
        }
    }

    /// Replaces a stored document with editor content.
    #[tracing::instrument(
        skip(self, identity, content, target),
        fields(rid = %identity.rid(), id = %identity.id())
    )]
    pub async fn update(
        &self,
        identity: &DocumentIdentity,
        content: &str,
        target: EditTarget<'_>,
    ) -> DocpaneResult<DocumentIdentity> {
        target.status.reset_errors();
        let document = match parse_content(content) {
            Ok(document) => document,
            Err(error) => return Err(self.reject(target.status, error)),
        };

        target.status.set_executing(true);
        let span = OperationSpan::start(
            self.collaborators.instrumentation.as_ref(),
            Action::UpdateDocument,
            &self.span_context,
        );
        let dialect = self.dialect();

        match self
            .backend
            .update(&self.container, identity, &Value::Object(document))
            .await
        {
            Ok(raw) => {
                let updated = DocumentIdentity::resolve(&raw, dialect, &self.resolver)
                    .filter(|resolved| resolved.rid() == identity.rid())
                    .unwrap_or_else(|| {
                        let mut updated = identity.clone();
                        if let Some(id) = raw.public_id(dialect) {
                            updated.set_id(id);
                        }
                        updated
                    });
                if target
                    .identities
                    .replace_id(identity.rid(), updated.id().clone())
                    .is_none()
                {
                    tracing::debug!("Updated document is not in the fetched list");
                }
                target
                    .editor
                    .save_succeeded(updated.clone(), raw.format_for_editor(dialect));
                target.status.set_executing(false);
                span.succeed();
                tracing::info!(new_id = %updated.id(), "Document updated");
                Ok(updated)
            }
            Err(error) => Err(self.backend_failed(target.status, span, error)),
        }
    }

    /// Deletes a stored document after confirmation.
    #[tracing::instrument(
        skip(self, identity, target),
        fields(rid = %identity.rid(), id = %identity.id())
    )]
    pub async fn delete(
        &self,
        identity: &DocumentIdentity,
        target: EditTarget<'_>,
    ) -> DocpaneResult<DeleteOutcome> {
        if !self
            .collaborators
            .confirm
            .confirm(self.dialect().delete_confirmation())
        {
            tracing::debug!("Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        target.status.reset_errors();
        target.status.set_executing(true);
        let span = OperationSpan::start(
            self.collaborators.instrumentation.as_ref(),
            Action::DeleteDocument,
            &self.span_context,
        );

        match self.backend.delete(&self.container, identity).await {
            Ok(()) => {
                target.identities.remove(identity.rid());
                let shown = target
                    .editor
                    .selected()
                    .is_none_or(|selected| selected.rid() == identity.rid());
                if shown {
                    target.editor.delete_succeeded();
                }
                target.status.set_executing(false);
                span.succeed();
                tracing::info!("Document deleted");
                Ok(DeleteOutcome::Deleted(identity.clone()))
            }
            Err(error) => Err(self.backend_failed(target.status, span, error)),
        }
    }

    /// Reads a document into the editor, confirming first if edits would be lost.
    #[tracing::instrument(
        skip(self, identity, target),
        fields(rid = %identity.rid(), id = %identity.id())
    )]
    pub async fn select(
        &self,
        identity: &DocumentIdentity,
        target: EditTarget<'_>,
    ) -> DocpaneResult<SelectOutcome> {
        if target.editor.is_dirty() && !self.collaborators.confirm.confirm(DISCARD_CONFIRMATION) {
            tracing::debug!("Selection change declined, keeping edits");
            return Ok(SelectOutcome::Declined);
        }

        target.status.reset_errors();
        target.status.set_executing(true);
        let result = self.backend.read(&self.container, identity).await;
        target.status.set_executing(false);

        match result {
            Ok(raw) => {
                target
                    .editor
                    .select_existing(identity.clone(), raw.format_for_editor(self.dialect()));
                Ok(SelectOutcome::Selected(identity.clone()))
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to read document");
                self.collaborators
                    .notify
                    .notify_error(&error.failure_message());
                target.status.set_execution_error();
                Err(error)
            }
        }
    }

    fn validate_new(&self, content: &str) -> DocpaneResult<Map<String, Value>> {
        let document = parse_content(content)?;
        if !(self.dialect().requires_shard_key_on_create() && self.resolver.requires_shard_key()) {
            return Ok(document);
        }
        match self.resolver.shard_key_property() {
            Some(property)
                if property != self.dialect().id_field() && !self.resolver.has_shard_key(&document) =>
            {
                Err(ValidationError::new(ValidationErrorKind::MissingShardKey(property)).into())
            }
            _ => Ok(document),
        }
    }

    fn reject(&self, status: &mut TabStatus, error: DocpaneError) -> DocpaneError {
        match error.kind() {
            DocpaneErrorKind::Validation(validation)
                if matches!(validation.kind, ValidationErrorKind::MissingShardKey(_)) =>
            {
                tracing::error!(error = %error, "Failed to save new document: shard key not defined");
            }
            _ => tracing::warn!(error = %error, "Rejected document content"),
        }
        status.set_inline_error(error.failure_message());
        error
    }

    fn backend_failed(
        &self,
        status: &mut TabStatus,
        span: OperationSpan<'_>,
        error: DocpaneError,
    ) -> DocpaneError {
        tracing::error!(action = %span.action(), error = %error, "Backend operation failed");
        span.fail(&error);
        self.collaborators
            .notify
            .notify_error(&error.failure_message());
        status.set_execution_error();
        status.set_executing(false);
        error
    }
}

/// Parses editor content into a JSON object.
fn parse_content(content: &str) -> DocpaneResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::new(ValidationErrorKind::NotAnObject).into()),
        Err(e) => Err(ValidationError::new(ValidationErrorKind::MalformedContent(e.to_string())).into()),
    }
}
