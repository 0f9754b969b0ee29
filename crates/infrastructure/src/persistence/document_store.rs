//! File-backed working documents.
//!
//! Working documents are stored as YAML by default, or JSON when the path
//! ends in `.json`. Missing sections read back as their empty defaults.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use wexcfg_application::ApplicationError;
use wexcfg_domain::ConfigurationDocument;

use crate::serialization::{from_json, to_json_stable};

/// Errors from reading or writing document files.
#[derive(Debug, thiserror::Error)]
pub enum DocumentIoError {
    /// The file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The target exists and overwriting was not requested.
    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The file content is not a valid document.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The document could not be encoded.
    #[error("Failed to encode document: {0}")]
    Encode(String),

    /// Other I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DocumentIoError> for ApplicationError {
    fn from(error: DocumentIoError) -> Self {
        Self::Io(error.to_string())
    }
}

/// On-disk format of a working document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML text.
    Yaml,
    /// JSON text.
    Json,
}

impl DocumentFormat {
    /// Picks the format from the file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Reads and writes working documents with `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore;

impl DocumentStore {
    /// Creates a new `DocumentStore`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a working document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentIoError::NotFound`] for a missing file and
    /// [`DocumentIoError::Parse`] when the content is not a document.
    pub async fn load(&self, path: &Path) -> Result<ConfigurationDocument, DocumentIoError> {
        let text = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DocumentIoError::NotFound(path.to_path_buf())
            } else {
                DocumentIoError::Io(e)
            }
        })?;

        let parse_error = |message: String| DocumentIoError::Parse {
            path: path.to_path_buf(),
            message,
        };
        let doc = match DocumentFormat::from_path(path) {
            DocumentFormat::Json => from_json(&text).map_err(|e| parse_error(e.to_string()))?,
            DocumentFormat::Yaml => {
                serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))?
            }
        };
        debug!(path = %path.display(), "loaded document");
        Ok(doc)
    }

    /// Saves a working document in the format its path implies.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentIoError::AlreadyExists`] if the file exists and
    /// `overwrite` is false.
    pub async fn save(
        &self,
        path: &Path,
        doc: &ConfigurationDocument,
        overwrite: bool,
    ) -> Result<(), DocumentIoError> {
        let text = self.render(doc, DocumentFormat::from_path(path))?;
        self.write_text(path, &text, overwrite).await
    }

    /// Renders a working document as text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentIoError::Encode`] if the document cannot be encoded.
    pub fn render(
        &self,
        doc: &ConfigurationDocument,
        format: DocumentFormat,
    ) -> Result<String, DocumentIoError> {
        match format {
            DocumentFormat::Json => {
                to_json_stable(doc).map_err(|e| DocumentIoError::Encode(e.to_string()))
            }
            DocumentFormat::Yaml => {
                serde_yaml::to_string(doc).map_err(|e| DocumentIoError::Encode(e.to_string()))
            }
        }
    }

    /// Writes text to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentIoError::AlreadyExists`] if the file exists and
    /// `overwrite` is false.
    pub async fn write_text(
        &self,
        path: &Path,
        content: &str,
        overwrite: bool,
    ) -> Result<(), DocumentIoError> {
        if !overwrite && fs::metadata(path).await.is_ok() {
            return Err(DocumentIoError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content).await?;
        debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }
}
