//! Catalog sources.
//!
//! Fetching the definition list is the host's business; the engine only
//! needs the raw JSON text. `FileSource` and `StaticSource` cover the
//! common cases of a `cards.json` on disk and an embedded list.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// Something that can hand over the raw catalog text.
pub trait CatalogSource {
    /// Fetch the raw definition list.
    fn fetch(&self) -> Result<String, SourceError>;

    /// Short description used in log lines.
    fn describe(&self) -> String {
        "catalog source".to_string()
    }
}

/// Reads the catalog from a file on disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileSource {
    fn fetch(&self) -> Result<String, SourceError> {
        fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a fixed, in-memory catalog text.
#[derive(Clone, Debug)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    /// Wrap the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl CatalogSource for StaticSource {
    fn fetch(&self) -> Result<String, SourceError> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "static catalog".to_string()
    }
}
