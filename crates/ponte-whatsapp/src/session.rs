// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk session credential store.
//!
//! The automation runtime owns the contents and format of the session
//! directory; the bridge only guarantees the directory exists before the
//! runtime launches and can wipe it when a session must be discarded.

use std::path::{Path, PathBuf};

use ponte_core::PonteError;

/// Handle to the session credential directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Whether a previous session left credentials behind. Used only for
    /// operator-facing logging; the runtime decides whether they restore.
    pub async fn has_credentials(&self) -> bool {
        match tokio::fs::read_dir(&self.dir).await {
            Ok(mut entries) => matches!(entries.next_entry().await, Ok(Some(_))),
            Err(_) => false,
        }
    }

    /// Creates the directory (and parents) if missing.
    pub async fn ensure(&self) -> Result<(), PonteError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PonteError::Session { source: Box::new(e) })
    }

    /// Removes all persisted credentials. The next runtime launch will have
    /// to issue a fresh QR challenge.
    pub async fn clear(&self) -> Result<(), PonteError> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PonteError::Session { source: Box::new(e) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("a/b/session"));
        store.ensure().await.unwrap();
        assert!(store.path().is_dir());
    }

    #[tokio::test]
    async fn fresh_store_has_no_credentials() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session"));
        assert!(!store.has_credentials().await);
        store.ensure().await.unwrap();
        assert!(!store.has_credentials().await);
    }

    #[tokio::test]
    async fn credentials_are_detected_and_cleared() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("session"));
        store.ensure().await.unwrap();
        tokio::fs::write(store.path().join("creds.bin"), b"blob")
            .await
            .unwrap();
        assert!(store.has_credentials().await);

        store.clear().await.unwrap();
        assert!(!store.has_credentials().await);
    }

    #[tokio::test]
    async fn clear_on_missing_directory_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("never-created"));
        assert!(store.clear().await.is_ok());
    }
}
