//! Error types for the docpane document explorer.
//!
//! This crate provides the foundation error types used throughout the docpane workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Two kinds matter to the explorer itself: [`ValidationError`] is raised locally
//! before any network call, [`BackendError`] wraps whatever the active backend
//! adapter reported.
//!
//! # Examples
//!
//! ```
//! use docpane_error::{BackendError, DocpaneResult};
//!
//! fn query() -> DocpaneResult<Vec<String>> {
//!     Err(BackendError::new("Request rate is large"))?
//! }
//!
//! let err = query().unwrap_err();
//! assert_eq!(err.failure_message(), "Request rate is large");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod config;
mod error;
mod io;
mod json;
mod validation;

pub use backend::BackendError;
pub use config::ConfigError;
pub use error::{DocpaneError, DocpaneErrorKind, DocpaneResult};
pub use io::IoError;
pub use json::JsonError;
pub use validation::{ValidationError, ValidationErrorKind};
