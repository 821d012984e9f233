//! Aggregate-style server source.
//!
//! Enumerates forms from `<url>/formList` (JSON listing) and emits one
//! briefcase invocation per selected form for each transfer phase.

use std::time::Duration;

use serde::Deserialize;

use formflow_core::{FormDescriptor, SharedConfig};

use crate::config::{Credentials, SourceConfig};
use crate::error::{unavailable, SourceError};
use crate::{SourceProvider, RUNTIME_INVOCATION};

const LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// One entry of the remote form listing.
#[derive(Debug, Deserialize)]
struct AggregateFormItem {
    #[serde(rename = "formId")]
    form_id: String,
    name: String,
}

/// A configured Aggregate endpoint.
#[derive(Debug, Clone)]
pub struct AggregateSource {
    url: String,
    credentials: Option<Credentials>,
    form_list_override: Option<Vec<FormDescriptor>>,
}

impl AggregateSource {
    pub fn new(url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            url: url.into(),
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

    pub fn url(&self) -> &str {
        &self.url
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
                    "{RUNTIME_INVOCATION} {flag} --form_id {} --storage_directory {} --aggregate_url {}",
                    form.id,
                    shared.storage_dir.display(),
                    self.url,
                );
                if let Some(creds) = &self.credentials {
                    line.push_str(&format!(
                        " --odk_username {} --odk_password {}",
                        creds.username, creds.password
                    ));
                }
                line
            })
            .collect()
    }
}

impl SourceProvider for AggregateSource {
    fn kind(&self) -> &'static str {
        "aggregate"
    }

    fn description(&self) -> String {
        match &self.credentials {
            Some(creds) => format!("Aggregate server at {} (user {})", self.url, creds.username),
            None => format!("Aggregate server at {}", self.url),
        }
    }

    fn form_list(&self) -> Result<Vec<FormDescriptor>, SourceError> {
        if let Some(forms) = &self.form_list_override {
            return Ok(forms.clone());
        }
        let endpoint = format!("{}/formList", self.url.trim_end_matches('/'));
        tracing::debug!("enumerating forms from {endpoint}");

        let mut request = ureq::get(&endpoint).timeout(LIST_TIMEOUT);
        if let Some(creds) = &self.credentials {
            request = request.set("Authorization", &basic_auth(creds));
        }
        let response = request.call().map_err(|e| unavailable(&endpoint, e))?;
        let items: Vec<AggregateFormItem> = response
            .into_json()
            .map_err(|e| unavailable(&endpoint, e))?;

        Ok(items
            .into_iter()
            .map(|item| FormDescriptor::new(item.form_id, item.name))
            .collect())
    }

    fn pull_command_lines(
        &self,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String> {
        self.command_lines("--pull_aggregate", selected, shared)
    }

    fn push_command_lines(
        &self,
        selected: &[FormDescriptor],
        shared: &SharedConfig,
    ) -> Vec<String> {
        self.command_lines("--push_aggregate", selected, shared)
    }

    fn config(&self) -> SourceConfig {
        SourceConfig::Aggregate {
            url: self.url.clone(),
            credentials: self.credentials.clone(),
        }
    }
}

pub(crate) fn basic_auth(creds: &Credentials) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    let token = STANDARD.encode(format!("{}:{}", creds.username, creds.password));
    format!("Basic {token}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_core::FormId;

    fn shared() -> SharedConfig {
        SharedConfig::new("/data")
    }

    fn census() -> FormDescriptor {
        FormDescriptor::new("f1", "Census")
    }

    #[test]
    fn pull_line_per_selected_form() {
        let source = AggregateSource::new("https://agg.example.org", None);
        let lines = source.pull_command_lines(&[census()], &shared());
        assert_eq!(
            lines,
            vec![
                "java -jar briefcase.jar --pull_aggregate --form_id f1 \
                 --storage_directory /data --aggregate_url https://agg.example.org"
            ]
        );
    }

    #[test]
    fn credential_flags_appended_when_present() {
        let source = AggregateSource::new(
            "https://agg.example.org",
            Some(Credentials::new("ada", "pw")),
        );
        let lines = source.push_command_lines(&[census()], &shared());
        assert!(lines[0].starts_with("java -jar briefcase.jar --push_aggregate"));
        assert!(lines[0].ends_with("--odk_username ada --odk_password pw"));
    }

    #[test]
    fn lines_preserve_selection_order() {
        let source = AggregateSource::new("https://agg.example.org", None);
        let forms = vec![
            FormDescriptor::new("b", "Bravo"),
            FormDescriptor::new("a", "Alpha"),
        ];
        let lines = source.pull_command_lines(&forms, &shared());
        assert!(lines[0].contains("--form_id b"));
        assert!(lines[1].contains("--form_id a"));
    }

    #[test]
    fn empty_selection_yields_no_lines() {
        let source = AggregateSource::new("https://agg.example.org", None);
        assert!(source.pull_command_lines(&[], &shared()).is_empty());
    }

    #[test]
    fn override_short_circuits_enumeration() {
        let source =
            AggregateSource::new("https://unreachable.invalid", None).with_form_list(vec![census()]);
        let forms = source.form_list().expect("override");
        assert_eq!(forms[0].id, FormId::from("f1"));
    }

    #[test]
    fn description_omits_password() {
        let source = AggregateSource::new(
            "https://agg.example.org",
            Some(Credentials::new("ada", "s3cret")),
        );
        assert!(!source.description().contains("s3cret"));
    }
}
