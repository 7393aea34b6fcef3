// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ponte bridge.

use thiserror::Error;

/// The primary error type used across all Ponte adapters and the HTTP facade.
#[derive(Debug, Error)]
pub enum PonteError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging channel errors (runtime launch failure, send failure, protocol errors).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mail channel errors (transport construction, address parsing, SMTP rejection).
    #[error("mail error: {message}")]
    Mail {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Session store errors (cannot create or clear the on-disk session directory).
    #[error("session store error: {source}")]
    Session {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The listen address is already bound by another process.
    #[error("address already in use: {addr}")]
    PortInUse { addr: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
