// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ponte bridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ponte configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PonteConfig {
    /// HTTP facade bind settings and logging.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// WhatsApp automation runtime settings.
    #[serde(default)]
    pub whatsapp: WhatsappConfig,

    /// Outbound mail transport settings.
    #[serde(default)]
    pub mail: MailConfig,

    /// Cross-origin access policy for browser callers.
    #[serde(default)]
    pub cors: CorsConfig,
}

/// HTTP facade configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Host address to bind. All interfaces by default so LAN frontends
    /// can reach the bridge.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WhatsApp channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsappConfig {
    /// Command used to launch the browser-automation runtime.
    #[serde(default = "default_runtime_command")]
    pub runtime_command: String,

    /// Extra arguments passed to the runtime command.
    #[serde(default)]
    pub runtime_args: Vec<String>,

    /// Directory holding the persisted session credentials. The runtime
    /// owns the format; the bridge only creates and clears the directory.
    #[serde(default = "default_session_dir")]
    pub session_dir: String,

    /// Country calling code prepended to short local numbers.
    #[serde(default = "default_country_prefix")]
    pub country_prefix: String,

    /// Delay before the single reconnect attempt after a remote disconnect.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,

    /// Upper bound on a single send operation.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl Default for WhatsappConfig {
    fn default() -> Self {
        Self {
            runtime_command: default_runtime_command(),
            runtime_args: Vec::new(),
            session_dir: default_session_dir(),
            country_prefix: default_country_prefix(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

fn default_runtime_command() -> String {
    "ponte-wa-runtime".to_string()
}

fn default_session_dir() -> String {
    ".ponte/wa-session".to_string()
}

fn default_country_prefix() -> String {
    "55".to_string()
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

fn default_send_timeout_secs() -> u64 {
    30
}

/// Mail channel configuration.
///
/// The SMTP transport itself (host/port/credentials) is runtime state,
/// replaced over the HTTP facade and persisted to `store_path`; this section
/// only locates that store.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// Path of the JSON file holding the persisted transport config.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Upper bound on a single delivery attempt.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            send_timeout_secs: default_send_timeout_secs(),
        }
    }
}

fn default_store_path() -> String {
    ".ponte/mail.json".to_string()
}

/// Cross-origin access policy.
///
/// The default reflects any Origin back with credentials allowed, which is
/// what arbitrary-LAN deployments need. Hardened deployments set
/// `allow_any_origin_with_credentials = false` and list the frontends that
/// may authenticate in `allowed_origins`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Reflect every Origin header with `Allow-Credentials: true`.
    #[serde(default = "default_allow_any_origin")]
    pub allow_any_origin_with_credentials: bool,

    /// Origins reflected with credentials when the blanket toggle is off.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin_with_credentials: default_allow_any_origin(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_allow_any_origin() -> bool {
    true
}
