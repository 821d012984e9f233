//! Read-only form cache collaborator.
//!
//! The automation subsystem only ever reads the cache; it never writes to
//! the storage tree. [`DirFormCache`] is the on-disk implementation, which
//! scans `<storage>/forms/<form-dir>/` for form definitions:
//!
//! ```text
//! <storage>/
//!   forms/
//!     Census/
//!       Census.xml
//!     Household Survey/
//!       Household Survey.xml
//! ```
//!
//! The directory name is the display name; the form id is the directory
//! name with whitespace collapsed to `_` and lowercased, matching how
//! definitions are laid out on disk by the collection client.

use std::path::{Path, PathBuf};

use crate::error::CacheError;
use crate::types::FormDescriptor;

/// Enumerates the forms currently known to the local storage tree.
pub trait FormCache {
    fn get_forms(&self) -> Result<Vec<FormDescriptor>, CacheError>;
}

/// On-disk cache rooted at a storage directory.
#[derive(Debug, Clone)]
pub struct DirFormCache {
    storage_dir: PathBuf,
}

impl DirFormCache {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    fn forms_dir(&self) -> PathBuf {
        self.storage_dir.join("forms")
    }
}

impl FormCache for DirFormCache {
    fn get_forms(&self) -> Result<Vec<FormDescriptor>, CacheError> {
        let dir = self.forms_dir();
        if !dir.exists() {
            return Ok(vec![]);
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut forms = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if !has_definition(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            forms.push(FormDescriptor::new(id_for(&name), name));
        }
        // read_dir order is platform-dependent; sort for stable listings.
        forms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(forms)
    }
}

/// A form directory counts only when it holds an `.xml` definition.
fn has_definition(form_dir: &Path) -> bool {
    std::fs::read_dir(form_dir)
        .map(|entries| {
            entries.filter_map(|e| e.ok()).any(|e| {
                e.path().extension().and_then(|s| s.to_str()) == Some("xml")
            })
        })
        .unwrap_or(false)
}

fn id_for(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
