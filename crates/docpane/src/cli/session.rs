//! Opening a browsing tab over a fixture.

use super::StderrNotify;
use docpane::{
    BrowsingTab, Collaborators, Confirm, DocpaneConfig, DocpaneResult, Fixture, InMemoryBackend,
    IoError, TracingInstrumentation,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A tab plus the backend and fixture behind it.
#[derive(Debug)]
pub struct Session {
    /// Fixture file.
    pub path: PathBuf,
    /// Parsed fixture.
    pub fixture: Fixture,
    /// Backend seeded from the fixture.
    pub backend: Arc<InMemoryBackend>,
    /// Browsing tab over the fixture container.
    pub tab: BrowsingTab,
}

impl Session {
    /// Loads `path` and opens a tab on its container.
    pub fn open(
        path: &Path,
        config: &DocpaneConfig,
        confirm: Arc<dyn Confirm>,
    ) -> DocpaneResult<Self> {
        let fixture = Fixture::from_file(path)?;
        let backend = Arc::new(fixture.backend(*config.explorer().page_size()));
        let collaborators = Collaborators::new(
            Arc::new(TracingInstrumentation),
            confirm,
            Arc::new(StderrNotify),
        );
        let tab = BrowsingTab::new(
            fixture.container().clone(),
            backend.clone(),
            collaborators,
            &config.explorer().tab_settings()?,
        );
        Ok(Self {
            path: path.to_path_buf(),
            fixture,
            backend,
            tab,
        })
    }

    /// Writes the backend's current documents back to the fixture file.
    pub fn persist(&self) -> DocpaneResult<()> {
        self.fixture
            .with_documents(self.backend.documents())
            .save(&self.path)?;
        tracing::info!(path = %self.path.display(), "Fixture updated");
        Ok(())
    }
}

/// Reads a content argument: inline JSON, or `@path` for a file.
pub fn read_content(argument: &str) -> DocpaneResult<String> {
    match argument.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| IoError::new(format!("Failed to read {}: {}", path, e)).into()),
        None => Ok(argument.to_string()),
    }
}
