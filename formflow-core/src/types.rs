//! Domain types for the Formflow automation subsystem.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Descriptor types are serializable/deserializable via serde.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a data-collection form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub String);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FormId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FormId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The transfer phase a form descriptor was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Pull,
    /// Cache-enumerated forms default to the export phase.
    #[default]
    Export,
    Push,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDirection::Pull => write!(f, "pull"),
            TransferDirection::Export => write!(f, "export"),
            TransferDirection::Push => write!(f, "push"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Identity and metadata for one data-collection form.
///
/// Read-only to this subsystem: descriptors come from the form cache or a
/// source provider's enumeration and are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
    pub id: FormId,
    pub name: String,
    #[serde(default)]
    pub direction: TransferDirection,
}

impl FormDescriptor {
    pub fn new(id: impl Into<FormId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            direction: TransferDirection::default(),
        }
    }
}

/// Application-wide settings every provider needs when emitting command
/// lines. Built from the application preference scope after validation, so
/// the storage directory is always present here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedConfig {
    /// Root of the local submission storage tree.
    pub storage_dir: PathBuf,
    /// Whether the operator consented to persisting credentials.
    pub store_passwords: bool,
}

impl SharedConfig {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            store_passwords: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
