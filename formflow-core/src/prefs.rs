//! Named key-value preference scopes.
//!
//! # Storage layout
//!
//! ```text
//! ~/.formflow/
//!   prefs/
//!     app.yaml        (application scope — shared storage dir, consent flag)
//!     pull.yaml       (component scope — pull endpoint configuration)
//!     push.yaml       (component scope — push endpoint configuration)
//!     selection.yaml  (component scope — persisted selection flags)
//! ```
//!
//! Scope files are flat string→string YAML maps, written atomically
//! (serialize → `.tmp` sibling → chmod 0600 → rename) with the directory
//! created mode 0700 on first use.
//!
//! # API pattern
//!
//! Opening a file scope has two forms:
//! - `FilePrefs::open_at(root, scope)` — explicit root; used in tests with `TempDir`
//! - `FilePrefs::open(scope)` — derives root from `dirs::home_dir()`, delegates to `open_at`
//!
//! Tests must NEVER call `open`; always use `open_at`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{io_err, PrefsError};

// ---------------------------------------------------------------------------
// Scope names
// ---------------------------------------------------------------------------

/// Well-known scope names used by the automation subsystem.
pub mod scope {
    /// Application-wide scope: shared storage directory, consent flag.
    pub const APP: &str = "app";
    /// Component-local scope holding the pull endpoint configuration.
    pub const PULL: &str = "pull";
    /// Component-local scope holding the push endpoint configuration.
    pub const PUSH: &str = "push";
    /// Component-local scope holding persisted selection flags.
    pub const SELECTION: &str = "selection";
}

/// Application-scope key: shared storage directory.
pub const KEY_STORAGE_DIR: &str = "storage_directory";
/// Application-scope key: operator consent to persist credentials.
pub const KEY_STORE_PASSWORDS: &str = "store_passwords";

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// Opaque get/put/clear key-value contract for one preference scope.
///
/// The composer and synchronizer receive stores by reference at
/// construction; they never reach into process-wide state, so the whole
/// subsystem runs against [`MemoryPrefs`] in tests.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;
    /// Clear every key in the scope.
    fn clear(&mut self) -> Result<(), PrefsError>;
    /// All keys currently present, sorted.
    fn keys(&self) -> Vec<String>;

    /// `get` parsed as a boolean; absent or unparsable keys read as `false`.
    fn get_flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// A preference scope persisted as one YAML map file.
///
/// Every mutation saves immediately, so two sequential CLI invocations
/// observe each other's writes.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    /// `<root>/.formflow/prefs/<scope>.yaml` — pure, no I/O.
    pub fn scope_path_at(root: &Path, scope: &str) -> PathBuf {
        root.join(".formflow").join("prefs").join(format!("{scope}.yaml"))
    }

    /// Open (and load, if present) the named scope under an explicit root.
    pub fn open_at(root: &Path, scope: &str) -> Result<Self, PrefsError> {
        let path = Self::scope_path_at(root, scope);
        let values = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            serde_yaml::from_str(&contents).map_err(|e| PrefsError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// `open_at` convenience wrapper — root is `dirs::home_dir()`.
    pub fn open(scope: &str) -> Result<Self, PrefsError> {
        Self::open_at(&home()?, scope)
    }

    /// Atomically save the scope: serialize → `.tmp` sibling → chmod 0600 → rename.
    ///
    /// The `.tmp` is always in the same directory as the target (same
    /// filesystem — no EXDEV).
    fn save(&self) -> Result<(), PrefsError> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
                set_dir_permissions(dir)?;
            }
        }
        let tmp = self.path.with_extension("yaml.tmp");
        let yaml = serde_yaml::to_string(&self.values)?;
        std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PrefsError> {
        if self.values.is_empty() {
            return Ok(());
        }
        self.values.clear();
        self.save()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// In-memory store (tests, fakes)
// ---------------------------------------------------------------------------

/// Non-persistent store backing the same contract. Used in tests and
/// anywhere a throwaway scope is needed.
#[derive(Debug, Default, Clone)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.values.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PrefsError> {
        self.values.clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, PrefsError> {
    dirs::home_dir().ok_or(PrefsError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), PrefsError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), PrefsError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), PrefsError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), PrefsError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
