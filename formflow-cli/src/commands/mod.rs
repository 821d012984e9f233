//! Subcommand implementations and shared wiring.

pub mod config;
pub mod forms;
pub mod generate;
pub mod source;

use anyhow::{Context, Result};

use formflow_compose::AutomationController;
use formflow_core::{
    cache::{DirFormCache, FormCache},
    error::CacheError,
    prefs::{scope, FilePrefs, KEY_STORAGE_DIR},
    types::FormDescriptor,
    PreferenceStore,
};

/// Cache used before a storage directory is configured.
struct EmptyCache;

impl FormCache for EmptyCache {
    fn get_forms(&self) -> Result<Vec<FormDescriptor>, CacheError> {
        Ok(vec![])
    }
}

/// The form cache backing this invocation: the storage tree when one is
/// configured, otherwise empty.
pub(crate) fn open_cache() -> Result<Box<dyn FormCache>> {
    let app = FilePrefs::open(scope::APP).context("cannot open application preferences")?;
    Ok(match app.get(KEY_STORAGE_DIR) {
        Some(dir) => Box::new(DirFormCache::new(dir)),
        None => Box::new(EmptyCache),
    })
}

/// Build the controller over the home-rooted preference scopes, restoring
/// any previously persisted session.
pub(crate) fn open_controller() -> Result<AutomationController> {
    let pull = FilePrefs::open(scope::PULL).context("cannot open pull preferences")?;
    let push = FilePrefs::open(scope::PUSH).context("cannot open push preferences")?;
    let selection =
        FilePrefs::open(scope::SELECTION).context("cannot open selection preferences")?;
    let app = FilePrefs::open(scope::APP).context("cannot open application preferences")?;
    let cache = open_cache()?;

    AutomationController::new(
        Box::new(pull),
        Box::new(push),
        Box::new(selection),
        Box::new(app),
        cache.as_ref(),
    )
    .context("failed to restore automation session")
}
