//! Test utilities for docpane explorer tests.
//!
//! This module provides recording collaborators and fixture builders.

pub mod mock_collaborators;

#[allow(unused_imports)]
pub use mock_collaborators::{
    RecordingInstrumentation, RecordingNotify, ScriptedConfirm, SpanEvent, TestHarness,
};
