//! A browsing tab: one container, one query session, one editor.

use crate::{
    AutoSelect, Collaborators, CrudOrchestrator, DISCARD_CONFIRMATION, DeleteOutcome, EditTarget,
    EditorCommand, EditorSession, FetchOutcome, OperationSpan, QueryPaginationEngine,
    QuerySessionState, SelectOutcome, TabStatus, save_label,
};
use derive_builder::Builder;
use derive_getters::Getters;
use docpane_core::{ContainerHandle, DocumentIdentity, PartitionKeyResolver};
use docpane_error::{DocpaneResult, ValidationError, ValidationErrorKind};
use docpane_interface::{Action, DocumentBackend, SpanContext};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Per-tab settings.
///
/// # Examples
///
/// ```
/// use docpane_explorer::TabSettings;
///
/// let settings = TabSettings::builder().tab_title("Orders").build().unwrap();
/// assert_eq!(settings.tab_title(), "Orders");
/// assert!(*settings.cross_partition_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Builder)]
#[builder(setter(into))]
pub struct TabSettings {
    /// Title shown on the tab and attached to spans.
    #[builder(default = "String::from(\"Documents\")")]
    tab_title: String,
    /// Whether queries may span partitions.
    #[builder(default = "true")]
    cross_partition_enabled: bool,
}

impl TabSettings {
    /// Creates a builder.
    pub fn builder() -> TabSettingsBuilder {
        TabSettingsBuilder::default()
    }
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            tab_title: "Documents".to_string(),
            cross_partition_enabled: true,
        }
    }
}

/// Document browsing and editing controller for one container.
///
/// The tab owns its query session, editor session and status flags; nothing
/// is shared between tabs. Every operation returns its outcome and leaves
/// [`status`](Self::status) describing the last run.
#[derive(Debug)]
pub struct BrowsingTab {
    crud: CrudOrchestrator,
    engine: QueryPaginationEngine,
    editor: EditorSession,
    status: TabStatus,
    load_span_pending: bool,
}

impl BrowsingTab {
    /// Opens a tab on `container`.
    pub fn new(
        container: ContainerHandle,
        backend: Arc<dyn DocumentBackend>,
        collaborators: Collaborators,
        settings: &TabSettings,
    ) -> Self {
        let span_context = SpanContext::new(
            container.database_id().clone(),
            container.container_id().clone(),
            settings.tab_title().clone(),
        );
        let mut engine =
            QueryPaginationEngine::for_container(&container, *settings.cross_partition_enabled());
        engine.set_filter(container.dialect().default_filter());
        Self {
            crud: CrudOrchestrator::new(container, backend, collaborators, span_context),
            engine,
            editor: EditorSession::new(),
            status: TabStatus::default(),
            load_span_pending: true,
        }
    }

    /// Container being browsed.
    pub fn container(&self) -> &ContainerHandle {
        self.crud.container()
    }

    /// Partition key resolver of the container.
    pub fn resolver(&self) -> &PartitionKeyResolver {
        self.crud.resolver()
    }

    /// Query session.
    pub fn session(&self) -> &QuerySessionState {
        self.engine.state()
    }

    /// Displayed identities, in order.
    pub fn identities(&self) -> &[DocumentIdentity] {
        self.engine.state().identities().as_slice()
    }

    /// Editor session.
    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    /// Status of the last operation.
    pub fn status(&self) -> &TabStatus {
        &self.status
    }

    /// Commands enabled for the current editor state.
    pub fn enabled_commands(&self) -> BTreeSet<EditorCommand> {
        self.editor.enabled_commands()
    }

    /// Label of the save command.
    pub fn save_label(&self) -> &'static str {
        save_label(self.editor.state())
    }

    /// Header of the partition key column.
    pub fn partition_key_header(&self) -> Option<String> {
        self.resolver().partition_key_header()
    }

    /// Collapsed filter summary.
    pub fn filter_summary(&self) -> String {
        self.container()
            .dialect()
            .filter_summary(self.engine.state().filter())
    }

    /// Replaces the filter and loads its first page.
    pub async fn apply_filter(&mut self, filter: &str) -> DocpaneResult<FetchOutcome> {
        self.engine.set_filter(filter);
        self.load_more().await
    }

    /// Loads the next page of the current filter.
    ///
    /// The first load of the tab is recorded as a [`Action::LoadDocuments`] span.
    #[tracing::instrument(skip(self), fields(tab = %self.crud.span_context().tab_title()))]
    pub async fn load_more(&mut self) -> DocpaneResult<FetchOutcome> {
        self.status.reset_errors();
        self.status.set_executing(true);

        let collaborators = self.crud.collaborators().clone();
        let context = self.crud.span_context().clone();
        let span = self.load_span_pending.then(|| {
            OperationSpan::start(
                collaborators.instrumentation.as_ref(),
                Action::LoadDocuments,
                &context,
            )
        });
        self.load_span_pending = false;

        let result = self
            .engine
            .fetch_next_page(
                self.crud.backend().as_ref(),
                self.crud.container(),
                self.crud.resolver(),
            )
            .await;
        self.status.set_executing(false);

        let outcome = match result {
            Ok(outcome) => {
                if let Some(span) = span {
                    span.succeed();
                }
                outcome
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to load documents");
                if let Some(span) = span {
                    span.fail(&error);
                }
                collaborators.notify.notify_error(&error.failure_message());
                self.status.set_execution_error();
                return Err(error);
            }
        };

        if let FetchOutcome::Applied(merge) = &outcome {
            match merge.auto_select() {
                AutoSelect::Select(first) => {
                    let already_shown = self
                        .editor
                        .selected()
                        .is_some_and(|selected| selected.rid() == first.rid());
                    if !already_shown {
                        let first = first.clone();
                        if let Err(error) = self.select(&first).await {
                            tracing::warn!(error = %error, "Auto-selecting first match failed");
                        }
                    }
                }
                AutoSelect::ClearEditor => {
                    if !self.editor.is_dirty()
                        || collaborators.confirm.confirm(DISCARD_CONFIRMATION)
                    {
                        self.editor.clear();
                    } else {
                        tracing::debug!("Result set is empty, keeping unsaved edits");
                    }
                }
                AutoSelect::Keep => {}
            }
        }
        Ok(outcome)
    }

    /// Shows a document, confirming first if unsaved edits would be lost.
    pub async fn select(&mut self, identity: &DocumentIdentity) -> DocpaneResult<SelectOutcome> {
        let target = EditTarget {
            identities: self.engine.identities_mut(),
            editor: &mut self.editor,
            status: &mut self.status,
        };
        self.crud.select(identity, target).await
    }

    /// Shows the listed document with resource id `rid`.
    pub async fn select_rid(&mut self, rid: &str) -> DocpaneResult<SelectOutcome> {
        let identity = self
            .engine
            .state()
            .identities()
            .get(rid)
            .cloned()
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::NoDocumentSelected))?;
        self.select(&identity).await
    }

    /// Starts composing a new document.
    pub fn new_document(&mut self) {
        self.status.reset_errors();
        self.editor.start_new(*self.container().dialect());
    }

    /// Replaces the editor content.
    pub fn edit(&mut self, content: impl Into<String>) {
        self.editor.edit(content);
    }

    /// Throws away unsaved edits.
    pub fn discard(&mut self) {
        self.status.reset_errors();
        self.editor.discard();
    }

    /// Saves the editor content: creates a new document or updates the shown one.
    pub async fn save(&mut self) -> DocpaneResult<DocumentIdentity> {
        let content = self.editor.content().to_string();
        let state = self.editor.state();
        let selected = self.editor.selected().cloned();
        let target = EditTarget {
            identities: self.engine.identities_mut(),
            editor: &mut self.editor,
            status: &mut self.status,
        };

        match selected {
            _ if state.is_new() => self.crud.create(&content, target).await,
            Some(identity) if state.is_existing() => {
                self.crud.update(&identity, &content, target).await
            }
            _ => Err(ValidationError::new(ValidationErrorKind::NoDocumentSelected).into()),
        }
    }

    /// Deletes the shown document after confirmation.
    pub async fn delete_selected(&mut self) -> DocpaneResult<DeleteOutcome> {
        let identity = self
            .editor
            .selected()
            .cloned()
            .ok_or_else(|| ValidationError::new(ValidationErrorKind::NoDocumentSelected))?;
        let target = EditTarget {
            identities: self.engine.identities_mut(),
            editor: &mut self.editor,
            status: &mut self.status,
        };
        self.crud.delete(&identity, target).await
    }
}
