//! Central-style server source.
//!
//! Forms live under a numbered project; enumeration hits
//! `<url>/v1/projects/<id>/forms` and command lines carry the project id.

use std::time::Duration;

use serde::Deserialize;

use formflow_core::{FormDescriptor, SharedConfig};

use crate::aggregate::basic_auth;
use crate::config::{Credentials, SourceConfig};
use crate::error::{unavailable, SourceError};
use crate::{SourceProvider, RUNTIME_INVOCATION};

const LIST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct CentralFormItem {
    #[serde(rename = "xmlFormId")]
    xml_form_id: String,
    name: Option<String>,
}

/// A configured Central endpoint (server + project).
#[derive(Debug, Clone)]
pub struct CentralSource {
    url: String,
    project_id: u32,
    credentials: Option<Credentials>,
    form_list_override: Option<Vec<FormDescriptor>>,
}

impl CentralSource {
    pub fn new(
        url: impl Into<String>,
        project_id: u32,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            url: url.into(),
            project_id,
            credentials,
            form_list_override: None,
        }
    }

    /// Replace remote enumeration with a fixed listing (offline operation
    /// and tests).
    pub fn with_form_list(mut self, forms: Vec<FormDescriptor>) -> Self {
        self.form_list_override = Some(forms);
        self
    }

    fn command_lines(
        &self,
        flag: &str,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String> {
        selected
            .iter()
            .map(|form| {
                let mut line = format!(
                    "{RUNTIME_INVOCATION} {flag} --form_id {} --storage_directory {} \
                     --central_url {} --project_id {}",
                    form.id,
                    shared.storage_dir.display(),
                    self.url,
                    self.project_id,
                );
                if let Some(creds) = &self.credentials {
                    line.push_str(&format!(
                        " --central_username {} --central_password {}",
                        creds.username, creds.password
                    ));
                }
                line
            })
            .collect()
    }
}

impl SourceProvider for CentralSource {
    fn kind(&self) -> &'static str {
        "central"
    }

    fn description(&self) -> String {
        format!("Central server at {} (project {})", self.url, self.project_id)
    }

    fn form_list(&self) -> Result<Vec<FormDescriptor>, SourceError> {
        if let Some(forms) = &self.form_list_override {
            return Ok(forms.clone());
        }
        let endpoint = format!(
            "{}/v1/projects/{}/forms",
            self.url.trim_end_matches('/'),
            self.project_id
        );
        tracing::debug!("enumerating forms from {endpoint}");

        let mut request = ureq::get(&endpoint).timeout(LIST_TIMEOUT);
        if let Some(creds) = &self.credentials {
            request = request.set("Authorization", &basic_auth(creds));
        }
        let response = request.call().map_err(|e| unavailable(&endpoint, e))?;
        let items: Vec<CentralFormItem> = response
            .into_json()
            .map_err(|e| unavailable(&endpoint, e))?;

        Ok(items
            .into_iter()
            .map(|item| {
                let name = item.name.unwrap_or_else(|| item.xml_form_id.clone());
                FormDescriptor::new(item.xml_form_id, name)
            })
            .collect())
    }

    fn pull_command_lines(
        &self,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String> {
        self.command_lines("--pull_central", selected, shared)
    }

    fn push_command_lines(
        &self,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String> {
        self.command_lines("--push_central", selected, shared)
    }

    fn config(&self) -> SourceConfig {
        SourceConfig::Central {
            url: self.url.clone(),
            project_id: self.project_id,
            credentials: self.credentials.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
