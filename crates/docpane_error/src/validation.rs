//! Local validation error types.

/// Validation failures detected before contacting a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Editor content does not parse as JSON
    #[display("Document content is not valid JSON: {}", _0)]
    MalformedContent(String),
    /// Editor content parses but is not a JSON object
    #[display("Document content must be a JSON object")]
    NotAnObject,
    /// The document lacks the container's shard key
    #[display("The document is lacking the shard property: {}", _0)]
    MissingShardKey(String),
    /// An operation needs a selected document but none is selected
    #[display("No document is selected")]
    NoDocumentSelected,
}

/// Validation error with source location tracking.
///
/// # Examples
///
/// ```
/// use docpane_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::MissingShardKey("category".into()));
/// assert!(format!("{}", err).contains("category"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
