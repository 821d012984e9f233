//! Error types for formflow-compose.

use std::path::PathBuf;

use thiserror::Error;

use formflow_core::{CacheError, PrefsError};
use formflow_source::SourceError;

/// All errors that can arise from script composition and generation.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A required piece of configuration is absent at generation time.
    /// Fatal to the request; nothing is written, no state is mutated.
    #[error("missing configuration: {what}")]
    MissingConfiguration { what: &'static str },

    /// An error from a source provider.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// An error from the preference store.
    #[error("preference store error: {0}")]
    Prefs(#[from] PrefsError),

    /// An error from the form cache.
    #[error("form cache error: {0}")]
    Cache(#[from] CacheError),

    /// The script file could not be written; carries the underlying cause.
    #[error("failed to write script at {path}: {source}")]
    ScriptWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`ComposeError::MissingConfiguration`].
pub(crate) fn missing(what: &'static str) -> ComposeError {
    ComposeError::MissingConfiguration { what }
}
