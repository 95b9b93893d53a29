//! Typed failures of a sync run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a sync.
///
/// Returned inside [`crate::Error`]; callers that need the kind downcast with
/// `err.downcast_ref::<SyncError>()`.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The favorites source could not be queried or answered garbage.
    #[error("failed to fetch favorites from {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    /// A favorite record was rejected while the policy is strict.
    #[error("invalid favorite '{name}': {reason}")]
    Validation { name: String, reason: String },

    /// Reading, writing or bootstrapping an SSH configuration file failed.
    #[error("failed to update {}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Nothing survived fetching, filtering and validation.
    #[error("no {protocol} favorites found in {source_name}")]
    NoFavorites {
        source_name: String,
        protocol: String,
    },
}

impl SyncError {
    pub(crate) fn config_io(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source: source.into(),
        }
    }
}
