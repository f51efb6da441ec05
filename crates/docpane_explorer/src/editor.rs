//! Editor session state machine and command enablement.

use docpane_core::{Dialect, DocumentIdentity};
use serde_json::Value;
use std::collections::BTreeSet;

/// Editor states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, strum::Display, strum::EnumIter,
)]
pub enum EditorState {
    /// Nothing is shown.
    #[default]
    NoDocumentSelected,
    /// Composing a new document with well-formed content.
    NewDocumentValid,
    /// Composing a new document with malformed content.
    NewDocumentInvalid,
    /// Showing a stored document, unmodified.
    ExistingDocumentNoEdits,
    /// Stored document with well-formed edits.
    ExistingDocumentDirtyValid,
    /// Stored document with malformed edits.
    ExistingDocumentDirtyInvalid,
}

impl EditorState {
    /// Whether the editor is composing a new document.
    pub fn is_new(&self) -> bool {
        matches!(self, Self::NewDocumentValid | Self::NewDocumentInvalid)
    }

    /// Whether the editor shows a stored document.
    pub fn is_existing(&self) -> bool {
        matches!(
            self,
            Self::ExistingDocumentNoEdits
                | Self::ExistingDocumentDirtyValid
                | Self::ExistingDocumentDirtyInvalid
        )
    }
}

/// Editor commands whose enablement depends on the state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
pub enum EditorCommand {
    /// Start composing a new document.
    NewDocument,
    /// Save a new document or update an existing one.
    Save,
    /// Throw away unsaved edits.
    Discard,
    /// Delete the shown document.
    Delete,
}

/// Commands enabled in `state`.
///
/// # Examples
///
/// ```
/// use docpane_explorer::{EditorCommand, EditorState, enabled_commands};
///
/// let enabled = enabled_commands(EditorState::ExistingDocumentDirtyInvalid);
/// assert!(!enabled.contains(&EditorCommand::Save));
/// assert!(enabled.contains(&EditorCommand::Discard));
/// assert!(enabled.contains(&EditorCommand::Delete));
/// ```
pub fn enabled_commands(state: EditorState) -> BTreeSet<EditorCommand> {
    use EditorState::*;

    let mut enabled = BTreeSet::new();
    if !state.is_new() {
        enabled.insert(EditorCommand::NewDocument);
    }
    if matches!(state, NewDocumentValid | ExistingDocumentDirtyValid) {
        enabled.insert(EditorCommand::Save);
    }
    if matches!(
        state,
        NewDocumentValid | NewDocumentInvalid | ExistingDocumentDirtyValid | ExistingDocumentDirtyInvalid
    ) {
        enabled.insert(EditorCommand::Discard);
    }
    if state.is_existing() {
        enabled.insert(EditorCommand::Delete);
    }
    enabled
}

/// Label of the save command: "Save" for new documents, "Update" otherwise.
pub fn save_label(state: EditorState) -> &'static str {
    if state.is_existing() { "Update" } else { "Save" }
}

/// Parses editor content, returning the JSON object it holds.
pub fn parse_object(content: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn is_well_formed(content: &str) -> bool {
    parse_object(content).is_some()
}

/// The document shown in the editor.
///
/// Transitions never fail: malformed content is a state, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorSession {
    state: EditorState,
    content: String,
    baseline: String,
    selected: Option<DocumentIdentity>,
}

impl EditorSession {
    /// Empty session in [`EditorState::NoDocumentSelected`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Content shown in the editor.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Identity of the shown document; `None` while composing or empty.
    pub fn selected(&self) -> Option<&DocumentIdentity> {
        self.selected.as_ref()
    }

    /// Commands enabled in the current state.
    pub fn enabled_commands(&self) -> BTreeSet<EditorCommand> {
        enabled_commands(self.state)
    }

    /// Whether `command` is enabled.
    pub fn is_enabled(&self, command: EditorCommand) -> bool {
        self.enabled_commands().contains(&command)
    }

    /// Whether switching away would lose edits.
    pub fn is_dirty(&self) -> bool {
        match self.state {
            EditorState::NewDocumentValid | EditorState::NewDocumentInvalid => {
                self.content != self.baseline
            }
            EditorState::ExistingDocumentDirtyValid | EditorState::ExistingDocumentDirtyInvalid => {
                true
            }
            EditorState::NoDocumentSelected | EditorState::ExistingDocumentNoEdits => false,
        }
    }

    /// Starts composing a new document from the dialect template.
    pub fn start_new(&mut self, dialect: Dialect) {
        let template = dialect.new_document_template();
        self.content = template.clone();
        self.baseline = template;
        self.selected = None;
        self.state = EditorState::NewDocumentValid;
    }

    /// Replaces the content and re-derives validity.
    ///
    /// Ignored while no document is shown.
    pub fn edit(&mut self, content: impl Into<String>) {
        let content = content.into();
        let valid = is_well_formed(&content);
        self.state = match (self.state, valid) {
            (EditorState::NoDocumentSelected, _) => {
                tracing::debug!("Ignoring edit with no document shown");
                return;
            }
            (state, true) if state.is_new() => EditorState::NewDocumentValid,
            (_, true) => EditorState::ExistingDocumentDirtyValid,
            (state, false) if state.is_new() => EditorState::NewDocumentInvalid,
            (_, false) => EditorState::ExistingDocumentDirtyInvalid,
        };
        self.content = content;
    }

    /// Shows a stored document.
    pub fn select_existing(&mut self, identity: DocumentIdentity, formatted: String) {
        self.baseline = formatted.clone();
        self.content = formatted;
        self.selected = Some(identity);
        self.state = EditorState::ExistingDocumentNoEdits;
    }

    /// A save or update went through; `formatted` is the stored rendering.
    pub fn save_succeeded(&mut self, identity: DocumentIdentity, formatted: String) {
        self.select_existing(identity, formatted);
    }

    /// Throws away unsaved edits.
    pub fn discard(&mut self) {
        if self.state.is_new() {
            self.clear();
        } else if self.state.is_existing() {
            self.content = self.baseline.clone();
            self.state = EditorState::ExistingDocumentNoEdits;
        }
    }

    /// The shown document was deleted.
    pub fn delete_succeeded(&mut self) {
        if self.state.is_existing() {
            self.clear();
        }
    }

    /// Shows nothing.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
