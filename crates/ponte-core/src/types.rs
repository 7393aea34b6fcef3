// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Ponte bridge.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of the messaging channel.
///
/// Transitions are driven exclusively by adapter-emitted events; the HTTP
/// layer only ever reads this value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    /// No active session; the channel cannot send.
    Disconnected,
    /// A login challenge is pending; scan the QR code to authenticate.
    QrReady,
    /// Authenticated and able to send.
    Ready,
}

/// Whether the mail transport has usable credentials.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MailStatus {
    Configured,
    MissingCredentials,
}

/// Facade liveness marker. The only value a responding server ever reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    Online,
}

/// Identifies the kind of channel an adapter drives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ChannelType {
    Messaging,
    Mail,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but requires attention.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A messaging-channel state transition, broadcast to connected observers.
///
/// `qr` carries the current login challenge and is only present while the
/// channel is in [`ConnectionState::QrReady`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEvent {
    pub status: ConnectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr: Option<String>,
}

/// An event emitted by the underlying messaging automation client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// A new login challenge was issued.
    Qr(String),
    /// The session is authenticated and the channel can send.
    Ready,
    /// Authentication was rejected; the session is unusable.
    AuthFailure(String),
    /// The remote side terminated the session.
    Disconnected(String),
}
