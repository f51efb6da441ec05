//! Terminal collaborators.

use docpane_interface::{Confirm, Notify};
use std::io::{BufRead, Write};

/// Asks on stderr and reads the answer from stdin. Anything but y/yes declines.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = std::io::stderr();
        if write!(stderr, "{} [y/N] ", message)
            .and_then(|_| stderr.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read confirmation");
                false
            }
        }
    }
}

/// Accepts every prompt.
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(prompt = message, "Confirmed without asking");
        true
    }
}

/// Prints error notifications to stderr.
#[derive(Debug, Default)]
pub struct StderrNotify;

impl Notify for StderrNotify {
    fn notify_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}
