// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait implemented by every bridge channel adapter.

use async_trait::async_trait;

use crate::error::PonteError;
use crate::types::{ChannelType, HealthStatus};

/// The base trait for Ponte channel adapters.
///
/// Both channels (messaging and mail) implement this trait, which provides
/// identity, health check, and lifecycle capabilities.
#[async_trait]
pub trait BridgeAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of channel this adapter drives.
    fn channel_type(&self) -> ChannelType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, PonteError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), PonteError>;
}
