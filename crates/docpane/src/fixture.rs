//! JSON fixtures describing a container and its documents.

use derive_getters::Getters;
use docpane_core::{ContainerHandle, RawDocument};
use docpane_error::{DocpaneResult, IoError, JsonError};
use docpane_explorer::InMemoryBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument};

/// A container description plus the documents stored in it.
///
/// ```json
/// {
///   "container": {
///     "databaseId": "store",
///     "containerId": "products",
///     "dialect": "relational",
///     "partitionKey": { "paths": ["/category"], "kind": "Hash", "version": 2 }
///   },
///   "documents": [{ "id": "p1", "category": "books" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Fixture {
    /// Container the documents live in.
    container: ContainerHandle,
    /// Stored documents.
    #[serde(default)]
    documents: Vec<Value>,
}

impl Fixture {
    /// Creates a fixture.
    pub fn new(container: ContainerHandle, documents: Vec<Value>) -> Self {
        Self {
            container,
            documents,
        }
    }

    /// Reads a fixture from a JSON file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> DocpaneResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            IoError::new(format!(
                "Failed to read fixture {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let fixture: Self = serde_json::from_str(&text).map_err(JsonError::from)?;
        debug!(documents = fixture.documents.len(), "Fixture loaded");
        Ok(fixture)
    }

    /// Writes the fixture as pretty JSON.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> DocpaneResult<()> {
        let text = serde_json::to_string_pretty(self).map_err(JsonError::from)?;
        std::fs::write(path.as_ref(), text).map_err(|e| {
            IoError::new(format!(
                "Failed to write fixture {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        debug!(documents = self.documents.len(), "Fixture saved");
        Ok(())
    }

    /// In-memory backend holding the fixture documents.
    pub fn backend(&self, page_size: usize) -> InMemoryBackend {
        InMemoryBackend::new(*self.container.dialect())
            .with_page_size(page_size)
            .with_documents(self.documents.iter().cloned())
    }

    /// The same container with `documents` as its contents.
    pub fn with_documents(&self, documents: Vec<RawDocument>) -> Self {
        Self {
            container: self.container.clone(),
            documents: documents.into_iter().map(RawDocument::into_value).collect(),
        }
    }
}
