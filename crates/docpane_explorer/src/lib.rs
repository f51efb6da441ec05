//! Document browsing and editing controller.
//!
//! A [`BrowsingTab`] presents one container as a single document list, whichever
//! backend dialect serves it. It is assembled from four parts:
//!
//! - [`QueryPaginationEngine`] builds the effective query, pages through results
//!   and merges them into a deduplicated [`IdentityList`].
//! - [`EditorSession`] tracks what the editor shows and derives which commands
//!   are enabled.
//! - [`CrudOrchestrator`] validates, instruments and applies create, update,
//!   delete and read calls.
//! - [`docpane_core::PartitionKeyResolver`] answers every partition key question.
//!
//! [`InMemoryBackend`] implements the backend contract over documents held in
//! memory, and [`TracingInstrumentation`] logs spans through `tracing`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod crud;
mod editor;
mod identities;
mod memory_backend;
mod query;
mod query_text;
mod span;
mod status;
mod tab;
mod tracing_instrumentation;

pub use crud::{
    Collaborators, CrudOrchestrator, DISCARD_CONFIRMATION, DeleteOutcome, EditTarget,
    SelectOutcome,
};
pub use editor::{
    EditorCommand, EditorSession, EditorState, enabled_commands, parse_object, save_label,
};
pub use identities::IdentityList;
pub use memory_backend::{BackendCalls, InMemoryBackend};
pub use query::{
    AutoSelect, FetchOutcome, FetchTicket, PageMerge, QueryPaginationEngine, QuerySessionState,
};
pub use query_text::build_query_text;
pub use span::OperationSpan;
pub use status::TabStatus;
pub use tab::{BrowsingTab, TabSettings, TabSettingsBuilder, TabSettingsBuilderError};
pub use tracing_instrumentation::TracingInstrumentation;
