//! Error types for formflow-source.

use std::path::PathBuf;

use thiserror::Error;

use formflow_core::PrefsError;

/// All errors that can arise from source provider operations.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The endpoint could not be reached or answered with something other
    /// than a usable form listing.
    #[error("endpoint unavailable at {url}: {reason}")]
    EndpointUnavailable { url: String, reason: String },

    /// A persisted configuration record is missing a required key.
    #[error("stored source configuration is missing key '{key}'")]
    IncompleteConfiguration { key: &'static str },

    /// A persisted configuration record names a kind this build does not know.
    #[error("unknown source kind '{kind}'")]
    UnknownKind { kind: String },

    /// An error from the preference store.
    #[error("preference store error: {0}")]
    Prefs(#[from] PrefsError),

    /// An I/O error while scanning a local source directory.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SourceError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`SourceError::EndpointUnavailable`].
pub(crate) fn unavailable(url: impl Into<String>, reason: impl ToString) -> SourceError {
    SourceError::EndpointUnavailable {
        url: url.into(),
        reason: reason.to_string(),
    }
}
