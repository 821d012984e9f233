//! Export command builder — a pure mapping from one form to one command
//! line. No side effects, no deduplication, no reordering.

use std::path::{Path, PathBuf};

use formflow_core::FormDescriptor;
use formflow_source::RUNTIME_INVOCATION;

/// Export directory used when the operator supplies none.
pub const DEFAULT_EXPORT_DIR: &str = "/tmp";

/// Operator-supplied settings for one generation request.
///
/// The script directory has no default and must be supplied explicitly.
/// Runtime invocation and export directory are optional overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationConfig {
    /// Directory the generated script is written into.
    pub script_dir: PathBuf,
    /// Where export commands place their CSV output.
    pub export_dir: Option<PathBuf>,
    /// Override for the command prefix of every generated line.
    pub runtime_invocation: Option<String>,
}

impl AutomationConfig {
    pub fn new(script_dir: impl Into<PathBuf>) -> Self {
        Self {
            script_dir: script_dir.into(),
            export_dir: None,
            runtime_invocation: None,
        }
    }

    pub fn export_dir(&self) -> &Path {
        self.export_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_EXPORT_DIR))
    }

    pub fn runtime_invocation(&self) -> &str {
        self.runtime_invocation
            .as_deref()
            .unwrap_or(RUNTIME_INVOCATION)
    }
}

/// Build the export command for one form.
///
/// Form names are used verbatim — a name with shell-unsafe characters is a
/// caller-side data-quality issue, not handled here.
pub fn export_command(
    form: &FormDescriptor,
    runtime_invocation: &str,
    storage_dir: &Path,
    export_dir: &Path,
) -> String {
    format!(
        "{runtime_invocation} --export --form_id {} --storage_directory {} \
         --export_directory {} --export_filename {}.csv",
        form.id,
        storage_dir.display(),
        export_dir.display(),
        form.name,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_positional_template() {
        let form = FormDescriptor::new("f1", "Census");
        let line = export_command(
            &form,
            RUNTIME_INVOCATION,
            Path::new("/data"),
            Path::new("/tmp"),
        );
        assert_eq!(
            line,
            "java -jar briefcase.jar --export --form_id f1 --storage_directory /data \
             --export_directory /tmp --export_filename Census.csv"
        );
    }

    #[test]
    fn form_name_used_verbatim() {
        let form = FormDescriptor::new("f2", "Household Survey");
        let line = export_command(
            &form,
            RUNTIME_INVOCATION,
            Path::new("/data"),
            Path::new("/tmp"),
        );
        assert!(line.ends_with("--export_filename Household Survey.csv"));
    }

    #[test]
    fn config_defaults() {
        let config = AutomationConfig::new("/scripts");
        assert_eq!(config.export_dir(), Path::new("/tmp"));
        assert_eq!(config.runtime_invocation(), "java -jar briefcase.jar");
    }

    #[test]
    fn config_overrides_apply() {
        let mut config = AutomationConfig::new("/scripts");
        config.export_dir = Some(PathBuf::from("/exports"));
        config.runtime_invocation = Some("briefcase".to_string());
        assert_eq!(config.export_dir(), Path::new("/exports"));
        assert_eq!(config.runtime_invocation(), "briefcase");
    }
}
