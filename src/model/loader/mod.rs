//! Model graph loaders.
//!
//! Currently supports:
//! - **dbt manifest** (`manifest.json`) - models, columns and column tests
//!
//! # Example
//!
//! ```rust,ignore
//! use scaffold::config::LoaderSettings;
//! use scaffold::model::loader::load_manifest;
//! use std::path::Path;
//!
//! let graph = load_manifest(Path::new("target/manifest.json"), &LoaderSettings::default())?;
//! ```

mod manifest;

use std::fs;
use std::path::Path;
use thiserror::Error;

use super::ModelGraph;
use crate::config::LoaderSettings;

pub use manifest::parse_manifest;

/// Errors that can occur when loading a model graph.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// IO error reading file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest is not valid JSON
    #[error("Invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level section is absent
    #[error("Invalid manifest: missing '{0}' section")]
    MissingSection(String),

    /// A section is present but has the wrong shape
    #[error("Invalid manifest: '{section}' {message}")]
    InvalidSection { section: String, message: String },
}

/// Result type for model loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a model graph from a dbt `manifest.json`.
pub fn load_manifest(path: &Path, options: &LoaderSettings) -> LoadResult<ModelGraph> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    tracing::info!(path = %path.display(), "loading manifest");
    let content = fs::read_to_string(path)?;
    parse_manifest(&content, options)
}
