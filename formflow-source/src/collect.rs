//! Local collection-client directory source.
//!
//! Pull-only: a directory holds form definitions under `<dir>/forms/*.xml`
//! and submissions under `<dir>/instances/`. The pull phase is one batched
//! invocation over the whole directory; nothing can be pushed back to a
//! directory, so the push phase is empty.

use std::path::{Path, PathBuf};

use formflow_core::{FormDescriptor, SharedConfig};

use crate::config::SourceConfig;
use crate::error::{io_err, SourceError};
use crate::{SourceProvider, RUNTIME_INVOCATION};

/// A configured local collection directory.
#[derive(Debug, Clone)]
pub struct CollectDirSource {
    directory: PathBuf,
}

impl CollectDirSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl SourceProvider for CollectDirSource {
    fn kind(&self) -> &'static str {
        "collect_dir"
    }

    fn description(&self) -> String {
        format!("Collect directory at {}", self.directory.display())
    }

    fn form_list(&self) -> Result<Vec<FormDescriptor>, SourceError> {
        let forms_dir = self.directory.join("forms");
        if !forms_dir.exists() {
            return Ok(vec![]);
        }
        let entries = std::fs::read_dir(&forms_dir).map_err(|e| io_err(&forms_dir, e))?;

        let mut forms = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&forms_dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("xml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let id = stem
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .to_lowercase();
            forms.push(FormDescriptor::new(id, stem));
        }
        forms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(forms)
    }

    /// One batched invocation covering the whole directory, emitted only
    /// when something is selected.
    fn pull_command_lines(
        &self,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String> {
        if selected.is_empty() {
            return vec![];
        }
        vec![format!(
            "{RUNTIME_INVOCATION} --pull_collect --odk_directory {} --storage_directory {}",
            self.directory.display(),
            shared.storage_dir.display(),
        )]
    }

    /// A directory cannot be pushed to.
    fn push_command_lines(
        &self,
        _selected: &[FormDescriptor],
        _shared: &SharedConfig,
    ) -> Vec<String> {
        vec![]
    }

    fn config(&self) -> SourceConfig {
        SourceConfig::CollectDir {
            directory: self.directory.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
