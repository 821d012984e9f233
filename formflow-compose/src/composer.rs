//! Script composer — builds the ordered line sequence and writes it out.
//!
//! ## Layout contract
//!
//! ```text
//! <pull-phase lines>
//!
//!
//! <one export line per selected form>
//!
//!
//! <push-phase lines>
//! ```
//!
//! The sequence is built fresh on every generation request — never cached —
//! because source and selection state may have changed since the previous
//! run. Writing goes through a `.tmp` sibling and a rename, so no partial
//! script is observable at the target path on success.

use std::path::{Path, PathBuf};

use formflow_core::{FormDescriptor, SharedConfig};
use formflow_source::SourceProvider;

use crate::error::{missing, ComposeError};
use crate::export::{export_command, AutomationConfig};

/// Platform-selected script filename.
pub fn script_file_name() -> &'static str {
    if cfg!(windows) {
        "automation.bat"
    } else {
        "automation.sh"
    }
}

/// Build the full script line sequence.
///
/// Both providers must be present; absence of either fails the whole
/// request with [`ComposeError::MissingConfiguration`] before any line is
/// produced. Output order follows `selected`'s iteration order exactly.
pub fn compose(
    pull: Option<&dyn SourceProvider>,
    push: Option<&dyn SourceProvider>,
    selected: &[FormDescriptor],
    config: &AutomationConfig,
    shared: &SharedConfig,
) -> Result<Vec<String>, ComposeError> {
    let pull = pull.ok_or_else(|| missing("pull source"))?;
    let push = push.ok_or_else(|| missing("push source"))?;

    let mut lines = pull.pull_command_lines(selected, shared);

    // Two blank lines separate the phases.
    lines.push(String::new());
    lines.push(String::new());

    for form in selected {
        lines.push(export_command(
            form,
            config.runtime_invocation(),
            &shared.storage_dir,
            config.export_dir(),
        ));
    }

    lines.push(String::new());
    lines.push(String::new());

    lines.extend(push.push_command_lines(selected, shared));
    Ok(lines)
}

/// Write the sequence as newline-joined UTF-8 text to `target`.
///
/// Create-if-absent, truncate-if-present, atomic from the caller's point
/// of view: content goes to `<target>.tmp` first and is renamed into
/// place. Any I/O failure is wrapped as [`ComposeError::ScriptWriteFailed`]
/// with the cause attached; the `.tmp` is removed on rename failure.
pub fn write_script(lines: &[String], target: &Path) -> Result<(), ComposeError> {
    let content = format!("{}\n", lines.join("\n"));
    let tmp = PathBuf::from(format!("{}.tmp", target.display()));

    std::fs::write(&tmp, &content).map_err(|e| write_failed(target, e))?;
    if let Err(e) = std::fs::rename(&tmp, target) {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_failed(target, e));
    }

    tracing::info!("wrote script: {}", target.display());
    Ok(())
}

fn write_failed(path: &Path, source: std::io::Error) -> ComposeError {
    ComposeError::ScriptWriteFailed {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeSource;
    use std::fs;
    use tempfile::TempDir;

    fn census() -> FormDescriptor {
        FormDescriptor::new("f1", "Census")
    }

    fn shared() -> SharedConfig {
        SharedConfig::new("/data")
    }

    fn config() -> AutomationConfig {
        AutomationConfig::new("/scripts")
    }

    #[test]
    fn layout_is_pull_blanks_export_blanks_push() {
        let pull = FakeSource::new().with_pull_lines(vec!["pull --all".into()]);
        let push = FakeSource::new().with_push_lines(vec!["push --all".into()]);

        let lines = compose(
            Some(&pull),
            Some(&push),
            &[census()],
            &config(),
            &shared(),
        )
        .expect("compose");

        assert_eq!(
            lines,
            vec![
                "pull --all",
                "",
                "",
                "java -jar briefcase.jar --export --form_id f1 --storage_directory /data \
                 --export_directory /tmp --export_filename Census.csv",
                "",
                "",
                "push --all",
            ]
        );
    }

    #[test]
    fn empty_selection_keeps_separators() {
        let pull = FakeSource::new();
        let push = FakeSource::new();
        let lines =
            compose(Some(&pull), Some(&push), &[], &config(), &shared()).expect("compose");
        assert_eq!(lines, vec!["", "", "", ""]);
    }

    #[test]
    fn compose_is_idempotent() {
        let pull = FakeSource::new().with_pull_lines(vec!["pull --all".into()]);
        let push = FakeSource::new().with_push_lines(vec!["push --all".into()]);
        let selected = [census()];

        let first =
            compose(Some(&pull), Some(&push), &selected, &config(), &shared()).expect("compose");
        let second =
            compose(Some(&pull), Some(&push), &selected, &config(), &shared()).expect("compose");
        assert_eq!(first, second);
    }

    #[test]
    fn export_lines_follow_selection_order() {
        let pull = FakeSource::new();
        let push = FakeSource::new();
        let selected = [
            FormDescriptor::new("b", "Bravo"),
            FormDescriptor::new("a", "Alpha"),
        ];
        let lines =
            compose(Some(&pull), Some(&push), &selected, &config(), &shared()).expect("compose");
        let exports: Vec<_> = lines.iter().filter(|l| l.contains("--export")).collect();
        assert!(exports[0].contains("--form_id b"));
        assert!(exports[1].contains("--form_id a"));
    }

    #[test]
    fn missing_pull_provider_is_fatal() {
        let push = FakeSource::new();
        let err = compose(None, Some(&push), &[], &config(), &shared()).unwrap_err();
        assert!(
            matches!(err, ComposeError::MissingConfiguration { what } if what == "pull source"),
            "got: {err}"
        );
    }

    #[test]
    fn missing_push_provider_is_fatal() {
        let pull = FakeSource::new();
        let err = compose(Some(&pull), None, &[], &config(), &shared()).unwrap_err();
        assert!(matches!(err, ComposeError::MissingConfiguration { .. }), "got: {err}");
    }

    #[test]
    fn write_creates_file_with_trailing_newline() {
        let dir = TempDir::new().expect("dir");
        let target = dir.path().join(script_file_name());
        write_script(&["a".into(), "".into(), "b".into()], &target).expect("write");
        assert_eq!(fs::read_to_string(&target).expect("read"), "a\n\nb\n");
    }

    #[test]
    fn write_truncates_existing_file() {
        let dir = TempDir::new().expect("dir");
        let target = dir.path().join("automation.sh");
        fs::write(&target, "much longer previous content\nwith lines\n").expect("seed");
        write_script(&["short".into()], &target).expect("write");
        assert_eq!(fs::read_to_string(&target).expect("read"), "short\n");
    }

    #[test]
    fn write_into_missing_dir_is_script_write_failed() {
        let dir = TempDir::new().expect("dir");
        let target = dir.path().join("no-such-dir").join("automation.sh");
        let err = write_script(&["a".into()], &target).unwrap_err();
        assert!(matches!(err, ComposeError::ScriptWriteFailed { .. }), "got: {err}");
        assert!(!target.exists(), "no script may be created on failure");
    }

    #[test]
    fn write_cleans_up_tmp() {
        let dir = TempDir::new().expect("dir");
        let target = dir.path().join("automation.sh");
        write_script(&["a".into()], &target).expect("write");
        assert!(!dir.path().join("automation.sh.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_into_readonly_dir_fails_without_partial_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("dir");
        let readonly = dir.path().join("readonly");
        fs::create_dir_all(&readonly).expect("mkdir");
        let mut perms = fs::metadata(&readonly).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly, perms).unwrap();

        let target = readonly.join("automation.sh");
        let err = write_script(&["a".into()], &target).unwrap_err();
        assert!(matches!(err, ComposeError::ScriptWriteFailed { .. }), "got: {err}");
        assert!(!target.exists());

        let mut perms = fs::metadata(&readonly).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly, perms).unwrap();
    }

    #[test]
    fn platform_script_name() {
        if cfg!(windows) {
            assert_eq!(script_file_name(), "automation.bat");
        } else {
            assert_eq!(script_file_name(), "automation.sh");
        }
    }
}
