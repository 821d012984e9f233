//! Error types for formflow-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from preference scope operations.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes the scope file path.
    #[error("failed to parse preference scope at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.formflow/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Convenience constructor for [`PrefsError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PrefsError {
    PrefsError::Io {
        path: path.into(),
        source,
    }
}

/// All errors that can arise from reading the on-disk form cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Underlying I/O failure while scanning the storage tree.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
