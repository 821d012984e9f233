//! Test-only provider fake shared by the composer and controller tests.

use formflow_core::{FormDescriptor, SharedConfig};
use formflow_source::{SourceConfig, SourceError, SourceProvider};

/// Scriptable [`SourceProvider`] with canned forms and command lines.
#[derive(Debug, Default, Clone)]
pub struct FakeSource {
    forms: Vec<FormDescriptor>,
    pull_lines: Vec<String>,
    push_lines: Vec<String>,
    fail_enumeration: bool,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forms(mut self, forms: Vec<FormDescriptor>) -> Self {
        self.forms = forms;
        self
    }

    pub fn with_pull_lines(mut self, lines: Vec<String>) -> Self {
        self.pull_lines = lines;
        self
    }

    pub fn with_push_lines(mut self, lines: Vec<String>) -> Self {
        self.push_lines = lines;
        self
    }

    /// Enumeration fails with `EndpointUnavailable`.
    pub fn failing(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }
}

impl SourceProvider for FakeSource {
    fn kind(&self) -> &'static str {
        "fake"
    }

    fn description(&self) -> String {
        "fake source".to_string()
    }

    fn form_list(&self) -> Result<Vec<FormDescriptor>, SourceError> {
        if self.fail_enumeration {
            return Err(SourceError::EndpointUnavailable {
                url: "https://fake.example.org".to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(self.forms.clone())
    }

    fn pull_command_lines(
        &self,
        _selected: &[FormDescriptor],
        _shared: &SharedConfig,
    ) -> Vec<String> {
        self.pull_lines.clone()
    }

    fn push_command_lines(
        &self,
        _selected: &[FormDescriptor],
        _shared: &SharedConfig,
    ) -> Vec<String> {
        self.push_lines.clone()
    }

    fn config(&self) -> SourceConfig {
        SourceConfig::Aggregate {
            url: "https://fake.example.org".to_string(),
            credentials: None,
        }
    }
}
