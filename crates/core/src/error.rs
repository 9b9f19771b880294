use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to load model weights from disk.
///
/// Raised by `ScalePass::load_model` and propagated to whichever operation
/// triggered the load. Never retried automatically.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read model file {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid model data in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl ModelLoadError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The path the failed load was attempted from.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } => path,
            Self::Unreadable { path, .. } => path,
            Self::Invalid { path, .. } => path,
        }
    }
}
