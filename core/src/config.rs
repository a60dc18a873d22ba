//! Client configuration: which remote to talk to and how hard to try.
//!
//! ```toml
//! list_retry = true
//!
//! [remote]
//! kind = "http"
//! base_url = "http://127.0.0.1:3000"
//! ```

use serde::Deserialize;

use crate::error::ConfigError;
use crate::remote::{HttpRemote, InMemoryRemote, RemoteTodoService};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Retry the initial list fetch once before reporting failure.
    pub list_retry: bool,
    pub remote: RemoteConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            list_retry: true,
            remote: RemoteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteConfig {
    Http {
        base_url: String,
    },
    InMemory {
        #[serde(default = "seeded_by_default")]
        seeded: bool,
    },
}

fn seeded_by_default() -> bool {
    true
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig::Http {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Number of list attempts before the error is surfaced.
    pub fn list_attempts(&self) -> u32 {
        if self.list_retry {
            2
        } else {
            1
        }
    }
}

impl RemoteConfig {
    /// Build the remote this configuration names.
    pub fn connect(&self) -> Result<Box<dyn RemoteTodoService>, ConfigError> {
        match self {
            RemoteConfig::Http { base_url } => {
                let remote =
                    HttpRemote::connect(base_url).map_err(|e| ConfigError::Client(e.to_string()))?;
                Ok(Box::new(remote))
            }
            RemoteConfig::InMemory { seeded: true } => Ok(Box::new(InMemoryRemote::seeded())),
            RemoteConfig::InMemory { seeded: false } => Ok(Box::new(InMemoryRemote::empty())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SyncConfig::from_toml_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.list_attempts(), 2);
    }

    #[test]
    fn parses_http_remote() {
        let config = SyncConfig::from_toml_str(
            r#"
            list_retry = false

            [remote]
            kind = "http"
            base_url = "http://todo.internal:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.list_attempts(), 1);
        assert_eq!(
            config.remote,
            RemoteConfig::Http {
                base_url: "http://todo.internal:8080".to_string()
            }
        );
    }

    #[test]
    fn in_memory_defaults_to_seeded() {
        let config = SyncConfig::from_toml_str("[remote]\nkind = \"in_memory\"\n").unwrap();
        assert_eq!(config.remote, RemoteConfig::InMemory { seeded: true });
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = SyncConfig::from_toml_str("[remote]\nkind = \"carrier_pigeon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[tokio::test]
    async fn in_memory_config_connects() {
        let remote = RemoteConfig::InMemory { seeded: true }.connect().unwrap();
        assert_eq!(remote.list().await.unwrap().len(), 3);
    }
}
