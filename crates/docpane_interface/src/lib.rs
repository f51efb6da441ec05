//! Trait definitions for the docpane document explorer.
//!
//! The explorer talks to the outside world through four narrow seams:
//! a [`DocumentBackend`] adapter per dialect, an [`Instrumentation`] sink for
//! operation spans, a [`Confirm`] prompt for destructive or lossy actions, and a
//! [`Notify`] channel for surfacing backend failures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{Confirm, DocumentBackend, Instrumentation, Notify};
pub use types::{
    Action, Continuation, FailureDetails, QueryOptions, QueryPage, QueryRequest, SpanContext,
    SpanToken,
};
