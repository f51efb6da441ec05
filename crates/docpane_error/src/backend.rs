//! Backend error types.

/// Failure reported by a backend adapter (query, create, update, delete or read).
///
/// The adapter's dialect-specific error is flattened into a human-readable
/// message and, when the adapter has one, a stack or diagnostic trail.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Backend Error: {} at line {} in {}", message, line, file)]
pub struct BackendError {
    /// Error message
    pub message: String,
    /// Stack or diagnostic trail reported by the backend, if any
    pub stack: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl BackendError {
    /// Create a new BackendError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use docpane_error::BackendError;
    ///
    /// let err = BackendError::new("Entity with the specified id already exists");
    /// assert!(err.message.contains("already exists"));
    /// assert!(err.stack.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            stack: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attach a stack trail to the error.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}
