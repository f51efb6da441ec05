//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the docpane binary.

mod browse;
mod check;
mod commands;
mod edit;
mod prompts;
mod session;

pub use browse::browse;
pub use check::check;
pub use commands::{Cli, Commands, OutputFormat};
pub use edit::{create, delete};
pub use prompts::{AssumeYes, StderrNotify, StdinConfirm};
pub use session::{Session, read_content};
