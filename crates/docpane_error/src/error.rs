//! Top-level error wrapper types.

use crate::{BackendError, ConfigError, IoError, JsonError, ValidationError};

/// Every error the docpane crates can produce.
///
/// # Examples
///
/// ```
/// use docpane_error::{DocpaneError, JsonError};
///
/// let err: DocpaneError = JsonError::new("expected value").into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DocpaneErrorKind {
    /// Local validation failure
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Backend adapter failure
    #[from(BackendError)]
    Backend(BackendError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// File system error
    #[from(IoError)]
    Io(IoError),
}

/// Docpane error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Docpane Error: {}", _0)]
pub struct DocpaneError(Box<DocpaneErrorKind>);

impl DocpaneError {
    /// Create a new error from a kind.
    pub fn new(kind: DocpaneErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DocpaneErrorKind {
        &self.0
    }

    /// Whether this error was raised locally, before any backend call.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), DocpaneErrorKind::Validation(_))
    }

    /// Human-readable message without source location, suitable for display
    /// and for failure span markers.
    pub fn failure_message(&self) -> String {
        match self.kind() {
            DocpaneErrorKind::Validation(e) => e.kind.to_string(),
            DocpaneErrorKind::Backend(e) => e.message.clone(),
            DocpaneErrorKind::Config(e) => e.message.clone(),
            DocpaneErrorKind::Json(e) => e.message.clone(),
            DocpaneErrorKind::Io(e) => e.message.clone(),
        }
    }

    /// Stack trail attached to the error, if any.
    ///
    /// Backend errors report the adapter's own trail; other errors report the
    /// location where they were raised.
    pub fn failure_stack(&self) -> Option<String> {
        match self.kind() {
            DocpaneErrorKind::Backend(e) => e.stack.clone(),
            DocpaneErrorKind::Validation(e) => Some(format!("{}:{}", e.file, e.line)),
            DocpaneErrorKind::Config(e) => Some(format!("{}:{}", e.file, e.line)),
            DocpaneErrorKind::Json(e) => Some(format!("{}:{}", e.file, e.line)),
            DocpaneErrorKind::Io(e) => Some(format!("{}:{}", e.file, e.line)),
        }
    }
}

// Generic From implementation for any type that converts to DocpaneErrorKind
impl<T> From<T> for DocpaneError
where
    T: Into<DocpaneErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for docpane operations.
pub type DocpaneResult<T> = std::result::Result<T, DocpaneError>;
