//! Execution status owned by a browsing tab.

use derive_getters::Getters;
use serde::Serialize;

/// Advisory flags a view polls to disable controls and show errors.
///
/// The flags are not a lock: overlapping operations may both run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
pub struct TabStatus {
    /// A backend call is in flight.
    executing: bool,
    /// The last backend call failed.
    execution_error: bool,
    /// Local validation message shown next to the editor.
    inline_error: Option<String>,
}

impl TabStatus {
    /// Clears error flags before a new operation.
    pub fn reset_errors(&mut self) {
        self.execution_error = false;
        self.inline_error = None;
    }

    pub(crate) fn set_executing(&mut self, executing: bool) {
        self.executing = executing;
    }

    pub(crate) fn set_execution_error(&mut self) {
        self.execution_error = true;
    }

    pub(crate) fn set_inline_error(&mut self, message: impl Into<String>) {
        self.inline_error = Some(message.into());
    }
}
