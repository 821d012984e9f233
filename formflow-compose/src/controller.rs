//! Preference synchronizer & refresh notifier.
//!
//! [`AutomationController`] exclusively owns the two active provider slots
//! and the form selection set. External components read them through the
//! exposed operations and observe mutations through registered refresh
//! listeners; nothing mutates the state directly.
//!
//! Everything runs on the caller's thread: every operation blocks until it
//! returns or fails, configuration events are processed in arrival order,
//! and a generation request always observes the most recently completed
//! mutation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

use formflow_core::{
    prefs::{KEY_STORAGE_DIR, KEY_STORE_PASSWORDS},
    FormCache, FormId, PreferenceStore, SelectionSet, SharedConfig,
};
use formflow_source::{config as source_config, SourceProvider};

use crate::composer;
use crate::error::{missing, ComposeError};
use crate::export::AutomationConfig;

/// Selection-scope key prefix: `selected.<form-id>` = `"true"`.
const SELECTED_PREFIX: &str = "selected.";

/// Notification fanned out to registered listeners after a state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    /// A pull or push source was configured or replaced.
    SourcesChanged,
    /// The working form set or its selection flags changed.
    FormsUpdated,
    /// A script was generated successfully at the given path.
    GenerationConfirmed { path: PathBuf },
}

pub type RefreshListener = Box<dyn Fn(&RefreshEvent)>;

pub struct AutomationController {
    pull: Option<Box<dyn SourceProvider>>,
    push: Option<Box<dyn SourceProvider>>,
    forms: SelectionSet,
    pull_prefs: Box<dyn PreferenceStore>,
    push_prefs: Box<dyn PreferenceStore>,
    selection_prefs: Box<dyn PreferenceStore>,
    app_prefs: Box<dyn PreferenceStore>,
    listeners: Vec<RefreshListener>,
}

impl AutomationController {
    /// Build the controller and restore any previously persisted session.
    ///
    /// The working set starts from the form cache. Pull and push
    /// configurations are restored independently; a restored provider is
    /// eagerly enumerated and its forms merged, so a restarted session
    /// matches one left configured. If a restored endpoint is unreachable
    /// the provider stays configured and only the enumeration is skipped —
    /// startup is not the place to drop a working configuration.
    pub fn new(
        pull_prefs: Box<dyn PreferenceStore>,
        push_prefs: Box<dyn PreferenceStore>,
        selection_prefs: Box<dyn PreferenceStore>,
        app_prefs: Box<dyn PreferenceStore>,
        cache: &dyn FormCache,
    ) -> Result<Self, ComposeError> {
        let mut controller = Self {
            pull: None,
            push: None,
            forms: SelectionSet::from_forms(cache.get_forms()?),
            pull_prefs,
            push_prefs,
            selection_prefs,
            app_prefs,
            listeners: Vec::new(),
        };

        controller.pull = controller.restore_slot(ProviderSlot::Pull)?;
        controller.push = controller.restore_slot(ProviderSlot::Push)?;
        controller.apply_persisted_selection();
        Ok(controller)
    }

    /// Register a refresh listener. Listeners run synchronously, in
    /// registration order, after every state mutation; a panicking listener
    /// is isolated so the remaining listeners still run.
    pub fn register_listener(&mut self, listener: RefreshListener) {
        self.listeners.push(listener);
    }

    pub fn pull_source(&self) -> Option<&dyn SourceProvider> {
        self.pull.as_deref()
    }

    pub fn push_source(&self) -> Option<&dyn SourceProvider> {
        self.push.as_deref()
    }

    pub fn forms(&self) -> &SelectionSet {
        &self.forms
    }

    /// Configure a new pull source.
    ///
    /// Enumeration runs first: if the endpoint is unavailable the request
    /// fails and the previously active configuration — preferences
    /// included — is left untouched. On success the scope is cleared and
    /// rewritten, the working set is loaded wholesale from the new
    /// source's forms, and listeners are notified.
    pub fn set_pull_source(
        &mut self,
        provider: Box<dyn SourceProvider>,
    ) -> Result<(), ComposeError> {
        let forms = provider.form_list()?;
        let consent = self.app_prefs.get_flag(KEY_STORE_PASSWORDS);
        provider.config().store(self.pull_prefs.as_mut(), consent)?;
        self.pull = Some(provider);
        self.forms.load(forms);
        self.persist_selection()?;
        self.notify(&RefreshEvent::SourcesChanged);
        Ok(())
    }

    /// Configure a new push source. Symmetric to [`Self::set_pull_source`].
    pub fn set_push_source(
        &mut self,
        provider: Box<dyn SourceProvider>,
    ) -> Result<(), ComposeError> {
        let forms = provider.form_list()?;
        let consent = self.app_prefs.get_flag(KEY_STORE_PASSWORDS);
        provider.config().store(self.push_prefs.as_mut(), consent)?;
        self.push = Some(provider);
        self.forms.load(forms);
        self.persist_selection()?;
        self.notify(&RefreshEvent::SourcesChanged);
        Ok(())
    }

    /// Flag forms for inclusion in the next generated script.
    ///
    /// Returns the ids that were not in the working set.
    pub fn select_forms(&mut self, ids: &[FormId]) -> Result<Vec<FormId>, ComposeError> {
        self.toggle(ids, true)
    }

    /// Clear selection flags. Returns the ids that were not in the working set.
    pub fn deselect_forms(&mut self, ids: &[FormId]) -> Result<Vec<FormId>, ComposeError> {
        self.toggle(ids, false)
    }

    /// The form cache changed out-of-band: merge — never load — so user
    /// selections survive, then notify.
    pub fn handle_cache_update(&mut self, cache: &dyn FormCache) -> Result<(), ComposeError> {
        self.forms.merge(cache.get_forms()?);
        self.notify(&RefreshEvent::FormsUpdated);
        Ok(())
    }

    /// A form's status changed: refresh dependent views, nothing else.
    pub fn handle_form_status_change(&self) {
        self.notify(&RefreshEvent::FormsUpdated);
    }

    /// Compose and write the automation script.
    ///
    /// Single atomic request/response: no retry, no partial progress. On
    /// success the script path is returned and `GenerationConfirmed` is
    /// fanned out; on failure no event is produced and the error
    /// propagates to the caller.
    pub fn generate(&self, config: &AutomationConfig) -> Result<PathBuf, ComposeError> {
        let shared = self.shared_config()?;
        let selected = self.forms.selected_forms();
        let lines = composer::compose(
            self.pull.as_deref(),
            self.push.as_deref(),
            &selected,
            config,
            &shared,
        )?;
        let target = config.script_dir.join(composer::script_file_name());
        composer::write_script(&lines, &target)?;
        self.notify(&RefreshEvent::GenerationConfirmed {
            path: target.clone(),
        });
        Ok(target)
    }

    /// Application-scope settings, validated for generation.
    pub fn shared_config(&self) -> Result<SharedConfig, ComposeError> {
        let storage_dir = self
            .app_prefs
            .get(KEY_STORAGE_DIR)
            .ok_or_else(|| missing("shared storage directory"))?;
        Ok(SharedConfig {
            storage_dir: PathBuf::from(storage_dir),
            store_passwords: self.app_prefs.get_flag(KEY_STORE_PASSWORDS),
        })
    }

    fn toggle(&mut self, ids: &[FormId], selected: bool) -> Result<Vec<FormId>, ComposeError> {
        let mut unknown = Vec::new();
        for id in ids {
            let known = if selected {
                self.forms.select(id)
            } else {
                self.forms.deselect(id)
            };
            if !known {
                unknown.push(id.clone());
            }
        }
        self.persist_selection()?;
        self.notify(&RefreshEvent::FormsUpdated);
        Ok(unknown)
    }

    fn restore_slot(
        &mut self,
        slot: ProviderSlot,
    ) -> Result<Option<Box<dyn SourceProvider>>, ComposeError> {
        let prefs = match slot {
            ProviderSlot::Pull => self.pull_prefs.as_ref(),
            ProviderSlot::Push => self.push_prefs.as_ref(),
        };
        let Some(provider) = source_config::restore_provider(prefs)? else {
            return Ok(None);
        };
        match provider.form_list() {
            Ok(forms) => self.forms.merge(forms),
            Err(e) => tracing::warn!(
                "restored {} source could not enumerate forms: {e}",
                slot.label()
            ),
        }
        Ok(Some(provider))
    }

    fn apply_persisted_selection(&mut self) {
        for key in self.selection_prefs.keys() {
            if let Some(id) = key.strip_prefix(SELECTED_PREFIX) {
                // Stale ids (form gone from the cache) are simply ignored.
                self.forms.select(&FormId::from(id));
            }
        }
    }

    fn persist_selection(&mut self) -> Result<(), ComposeError> {
        self.selection_prefs.clear()?;
        let selected: Vec<FormId> = self
            .forms
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(form, _)| form.id.clone())
            .collect();
        for id in selected {
            self.selection_prefs
                .put(&format!("{SELECTED_PREFIX}{id}"), "true")?;
        }
        Ok(())
    }

    fn notify(&self, event: &RefreshEvent) {
        for listener in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::warn!("refresh listener panicked; remaining listeners still run");
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ProviderSlot {
    Pull,
    Push,
}

impl ProviderSlot {
    fn label(&self) -> &'static str {
        match self {
            ProviderSlot::Pull => "pull",
            ProviderSlot::Push => "push",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
