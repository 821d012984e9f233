//! Serialized source configuration — the persistence half of the provider
//! contract.
//!
//! A configuration lives in one component-local preference scope as flat
//! keys (`kind`, `url`, `username`, …), so "clear the scope" really does
//! drop every prior key. Credentials are written only when the operator
//! consented to storing passwords; endpoint identity always round-trips.

use std::path::PathBuf;

use chrono::Utc;

use formflow_core::PreferenceStore;

use crate::error::SourceError;
use crate::{AggregateSource, CentralSource, CollectDirSource, SourceProvider};

// Scope keys. Kept short and flat: the store is an opaque string map.
const KEY_KIND: &str = "kind";
const KEY_URL: &str = "url";
const KEY_PROJECT_ID: &str = "project_id";
const KEY_USERNAME: &str = "username";
const KEY_PASSWORD: &str = "password";
const KEY_DIRECTORY: &str = "directory";
const KEY_SAVED_AT: &str = "saved_at";

/// Username/password pair for an authenticated endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Tagged record of everything needed to rebuild a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Aggregate {
        url: String,
        credentials: Option<Credentials>,
    },
    Central {
        url: String,
        project_id: u32,
        credentials: Option<Credentials>,
    },
    CollectDir {
        directory: PathBuf,
    },
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Aggregate { .. } => "aggregate",
            SourceConfig::Central { .. } => "central",
            SourceConfig::CollectDir { .. } => "collect_dir",
        }
    }

    /// Persist this record into `prefs`, replacing whatever was there.
    ///
    /// Clears the scope first so stale keys from a previous kind never
    /// survive a reconfiguration. Credentials are written only when
    /// `store_credentials` is set.
    pub fn store(
        &self,
        prefs: &mut dyn PreferenceStore,
        store_credentials: bool,
    ) -> Result<(), SourceError> {
        prefs.clear()?;
        prefs.put(KEY_KIND, self.kind())?;
        prefs.put(KEY_SAVED_AT, &Utc::now().to_rfc3339())?;
        match self {
            SourceConfig::Aggregate { url, credentials } => {
                prefs.put(KEY_URL, url)?;
                store_creds(prefs, credentials.as_ref(), store_credentials)?;
            }
            SourceConfig::Central {
                url,
                project_id,
                credentials,
            } => {
                prefs.put(KEY_URL, url)?;
                prefs.put(KEY_PROJECT_ID, &project_id.to_string())?;
                store_creds(prefs, credentials.as_ref(), store_credentials)?;
            }
            SourceConfig::CollectDir { directory } => {
                prefs.put(KEY_DIRECTORY, &directory.to_string_lossy())?;
            }
        }
        Ok(())
    }

    /// Read a previously persisted record back out of `prefs`.
    ///
    /// Yields `Ok(None)` — not an error — when no configuration was ever
    /// stored in the scope.
    pub fn restore(prefs: &dyn PreferenceStore) -> Result<Option<Self>, SourceError> {
        let Some(kind) = prefs.get(KEY_KIND) else {
            return Ok(None);
        };
        let config = match kind.as_str() {
            "aggregate" => SourceConfig::Aggregate {
                url: require(prefs, KEY_URL)?,
                credentials: restore_creds(prefs),
            },
            "central" => SourceConfig::Central {
                url: require(prefs, KEY_URL)?,
                project_id: require(prefs, KEY_PROJECT_ID)?
                    .parse()
                    .map_err(|_| SourceError::IncompleteConfiguration { key: KEY_PROJECT_ID })?,
                credentials: restore_creds(prefs),
            },
            "collect_dir" => SourceConfig::CollectDir {
                directory: PathBuf::from(require(prefs, KEY_DIRECTORY)?),
            },
            other => {
                return Err(SourceError::UnknownKind {
                    kind: other.to_owned(),
                })
            }
        };
        Ok(Some(config))
    }

    /// Build the provider instance this record describes.
    pub fn into_provider(self) -> Box<dyn SourceProvider> {
        match self {
            SourceConfig::Aggregate { url, credentials } => {
                Box::new(AggregateSource::new(url, credentials))
            }
            SourceConfig::Central {
                url,
                project_id,
                credentials,
            } => Box::new(CentralSource::new(url, project_id, credentials)),
            SourceConfig::CollectDir { directory } => {
                Box::new(CollectDirSource::new(directory))
            }
        }
    }
}

/// Restore a provider directly from a scope, if one was persisted.
pub fn restore_provider(
    prefs: &dyn PreferenceStore,
) -> Result<Option<Box<dyn SourceProvider>>, SourceError> {
    Ok(SourceConfig::restore(prefs)?.map(SourceConfig::into_provider))
}

fn store_creds(
    prefs: &mut dyn PreferenceStore,
    credentials: Option<&Credentials>,
    consent: bool,
) -> Result<(), SourceError> {
    match credentials {
        Some(creds) if consent => {
            prefs.put(KEY_USERNAME, &creds.username)?;
            prefs.put(KEY_PASSWORD, &creds.password)?;
        }
        Some(_) => {
            tracing::debug!("credentials not persisted; store-passwords consent unset");
        }
        None => {}
    }
    Ok(())
}

fn restore_creds(prefs: &dyn PreferenceStore) -> Option<Credentials> {
    let username = prefs.get(KEY_USERNAME)?;
    let password = prefs.get(KEY_PASSWORD)?;
    Some(Credentials { username, password })
}

fn require(prefs: &dyn PreferenceStore, key: &'static str) -> Result<String, SourceError> {
    prefs
        .get(key)
        .ok_or(SourceError::IncompleteConfiguration { key })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_core::MemoryPrefs;

    fn aggregate_with_creds() -> SourceConfig {
        SourceConfig::Aggregate {
            url: "https://aggregate.example.org".to_string(),
            credentials: Some(Credentials::new("ada", "s3cret")),
        }
    }

    #[test]
    fn restore_on_fresh_scope_yields_none() {
        let prefs = MemoryPrefs::new();
        assert!(SourceConfig::restore(&prefs).expect("restore").is_none());
    }

    #[test]
    fn roundtrip_preserves_endpoint_identity() {
        let mut prefs = MemoryPrefs::new();
        aggregate_with_creds().store(&mut prefs, true).expect("store");

        let restored = SourceConfig::restore(&prefs).expect("restore").expect("some");
        assert_eq!(restored, aggregate_with_creds());
    }

    #[test]
    fn credentials_dropped_without_consent() {
        let mut prefs = MemoryPrefs::new();
        aggregate_with_creds().store(&mut prefs, false).expect("store");

        let restored = SourceConfig::restore(&prefs).expect("restore").expect("some");
        assert_eq!(
            restored,
            SourceConfig::Aggregate {
                url: "https://aggregate.example.org".to_string(),
                credentials: None,
            }
        );
        assert!(prefs.get("password").is_none());
    }

    #[test]
    fn central_roundtrip_keeps_project_id() {
        let mut prefs = MemoryPrefs::new();
        let config = SourceConfig::Central {
            url: "https://central.example.org".to_string(),
            project_id: 7,
            credentials: None,
        };
        config.store(&mut prefs, true).expect("store");

        let restored = SourceConfig::restore(&prefs).expect("restore").expect("some");
        assert_eq!(restored, config);
    }

    #[test]
    fn store_replaces_keys_from_previous_kind() {
        let mut prefs = MemoryPrefs::new();
        aggregate_with_creds().store(&mut prefs, true).expect("store");

        let dir_config = SourceConfig::CollectDir {
            directory: PathBuf::from("/sdcard/odk"),
        };
        dir_config.store(&mut prefs, true).expect("store");

        assert!(prefs.get("url").is_none(), "stale aggregate key survived");
        assert!(prefs.get("password").is_none());
        let restored = SourceConfig::restore(&prefs).expect("restore").expect("some");
        assert_eq!(restored, dir_config);
    }

    #[test]
    fn restore_unknown_kind_fails() {
        let mut prefs = MemoryPrefs::new();
        prefs.put("kind", "gopher").expect("put");
        let err = SourceConfig::restore(&prefs).unwrap_err();
        assert!(matches!(err, SourceError::UnknownKind { .. }), "got: {err}");
    }

    #[test]
    fn restore_missing_url_reports_key() {
        let mut prefs = MemoryPrefs::new();
        prefs.put("kind", "aggregate").expect("put");
        let err = SourceConfig::restore(&prefs).unwrap_err();
        assert!(err.to_string().contains("url"), "got: {err}");
    }
}
