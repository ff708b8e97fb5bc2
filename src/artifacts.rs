//! Loading the generated JSON artifacts.
//!
//! Artifacts are read from disk on every call; nothing is cached, so a
//! rebuild is visible to the next query without restarting the server.

use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The file does not exist. Query operations surface this unchanged.
    #[error("{path} does not exist")]
    Missing { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and parses the artifact at `path`.
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let shown = path.display().to_string();
    if !path.exists() {
        tracing::error!("File not found: {}", shown);
        return Err(ArtifactError::Missing { path: shown });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: shown.clone(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: shown,
        source,
    })
}
