//! Request documents on disk
//!
//! A request file holds one [`RequestDefinition`] as JSON (`.json`) or TOML
//! (`.toml`). Loading validates it into a [`Request`].

use std::path::{Path, PathBuf};
use thiserror::Error;
use witness_domain::{ConstructionError, Request, RequestDefinition};

#[derive(Error, Debug)]
pub enum RequestFileError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported request file extension '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid request in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConstructionError,
    },
}

/// Load and validate the request at `path`.
pub fn load_request(path: &Path) -> Result<Request, RequestFileError> {
    let definition = load_definition(path)?;
    Request::try_from(definition).map_err(|source| RequestFileError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse the request document at `path` without validating it.
pub fn load_definition(path: &Path) -> Result<RequestDefinition, RequestFileError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if extension != "json" && extension != "toml" {
        return Err(RequestFileError::UnsupportedFormat(extension));
    }

    let content = std::fs::read_to_string(path).map_err(|source| RequestFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if extension == "json" {
        serde_json::from_str(&content).map_err(|source| RequestFileError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&content).map_err(|source| RequestFileError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
