//! File system error types.

/// Reading or writing a file failed.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("IO Error: {} at line {} in {}", message, line, file)]
pub struct IoError {
    /// What failed, including the path
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl IoError {
    /// Create a new IoError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
