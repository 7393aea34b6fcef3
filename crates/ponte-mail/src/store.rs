// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON persistence for the mail transport configuration.
//!
//! One local file, replaced wholesale on every update, reloaded at startup.
//! Last write wins; no history is kept.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use ponte_core::PonteError;

/// SMTP credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAuth {
    pub user: String,
    pub pass: String,
}

/// Complete mail transport configuration.
///
/// `auth.user` doubles as the "configured" marker: an empty user means the
/// transport has never been set up and sends must be refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailTransportConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub auth: MailAuth,
}

impl Default for MailTransportConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            secure: false,
            auth: MailAuth::default(),
        }
    }
}

impl MailTransportConfig {
    /// Whether the transport has credentials worth attempting delivery with.
    pub fn is_configured(&self) -> bool {
        !self.auth.user.is_empty()
    }
}

/// File-backed store for [`MailTransportConfig`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted config, falling back to the default when the file
    /// is missing or unreadable. A corrupt file is reported and ignored
    /// rather than taking the bridge down.
    pub async fn load_or_default(&self) -> MailTransportConfig {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "mail config file is corrupt; using defaults"
                    );
                    MailTransportConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MailTransportConfig::default(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read mail config; using defaults"
                );
                MailTransportConfig::default()
            }
        }
    }

    /// Replace the persisted config with `config`.
    pub async fn persist(&self, config: &MailTransportConfig) -> Result<(), PonteError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    PonteError::Mail {
                        message: format!("failed to create mail config directory: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;
            }
        }

        let json = serde_json::to_vec_pretty(config).map_err(|e| PonteError::Internal(
            format!("failed to encode mail config: {e}"),
        ))?;
        tokio::fs::write(&self.path, json).await.map_err(|e| PonteError::Mail {
            message: format!("failed to persist mail config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_yields_default() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("mail.json"));
        let config = store.load_or_default().await;
        assert_eq!(config, MailTransportConfig::default());
        assert!(!config.is_configured());
    }

    #[tokio::test]
    async fn persist_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("mail.json"));

        let config = MailTransportConfig {
            host: "mail.example.com".into(),
            port: 465,
            secure: true,
            auth: MailAuth {
                user: "crm@example.com".into(),
                pass: "hunter2".into(),
            },
        };
        store.persist(&config).await.unwrap();

        let reloaded = store.load_or_default().await;
        assert_eq!(reloaded, config);
        assert!(reloaded.is_configured());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("mail.json"));

        let mut config = MailTransportConfig::default();
        config.auth.user = "first@example.com".into();
        store.persist(&config).await.unwrap();

        config.auth.user = "second@example.com".into();
        store.persist(&config).await.unwrap();

        assert_eq!(store.load_or_default().await.auth.user, "second@example.com");
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("mail.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = ConfigStore::new(&path);
        assert_eq!(store.load_or_default().await, MailTransportConfig::default());
    }

    #[tokio::test]
    async fn persist_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(tmp.path().join("nested/dir/mail.json"));
        store.persist(&MailTransportConfig::default()).await.unwrap();
        assert!(store.path().is_file());
    }

    #[test]
    fn wire_shape_is_nested() {
        let config = MailTransportConfig {
            host: "h".into(),
            port: 25,
            secure: false,
            auth: MailAuth {
                user: "u".into(),
                pass: "p".into(),
            },
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["auth"]["user"], "u");
        assert_eq!(json["auth"]["pass"], "p");
        assert_eq!(json["port"], 25);
    }
}
