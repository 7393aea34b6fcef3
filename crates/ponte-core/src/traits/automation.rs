// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam between the messaging channel adapter and the external automation
//! client that actually holds the authenticated session.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::PonteError;
use crate::types::ClientEvent;

/// Narrow interface over the browser-automation-backed messaging client.
///
/// The production implementation supervises an external runtime process; the
/// connection state machine only ever observes it through this trait, so
/// tests drive the adapter with a mock emitting synthetic [`ClientEvent`]s.
#[async_trait]
pub trait AutomationClient: Send + Sync + 'static {
    /// Starts (or restarts) the client and begins delivering lifecycle
    /// events on `events`. Returns an error if the client cannot launch.
    async fn start(&self, events: mpsc::Sender<ClientEvent>) -> Result<(), PonteError>;

    /// Delivers a text message to an already-canonical address.
    async fn send_text(&self, target: &str, body: &str) -> Result<(), PonteError>;

    /// Stops the client and tears down its session process, if any.
    async fn stop(&self) -> Result<(), PonteError>;
}
