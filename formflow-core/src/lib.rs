//! Formflow core library — domain types, selection set, preference scopes.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`selection`] — the keyed [`SelectionSet`]
//! - [`prefs`] — key-value preference scopes with file and memory backends
//! - [`cache`] — the read-only form cache collaborator
//! - [`error`] — [`PrefsError`], [`CacheError`]

pub mod cache;
pub mod error;
pub mod prefs;
pub mod selection;
pub mod types;

pub use cache::{DirFormCache, FormCache};
pub use error::{CacheError, PrefsError};
pub use prefs::{FilePrefs, MemoryPrefs, PreferenceStore};
pub use selection::SelectionSet;
pub use types::{FormDescriptor, FormId, SharedConfig, TransferDirection};
