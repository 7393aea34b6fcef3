// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ponte.toml` > `~/.config/ponte/ponte.toml` >
//! `/etc/ponte/ponte.toml` with environment variable overrides via the
//! `PONTE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PonteConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ponte/ponte.toml` (system-wide)
/// 3. `~/.config/ponte/ponte.toml` (user XDG config)
/// 4. `./ponte.toml` (local directory)
/// 5. `PONTE_*` environment variables
pub fn load_config() -> Result<PonteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PonteConfig::default()))
        .merge(Toml::file("/etc/ponte/ponte.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ponte/ponte.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ponte.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PonteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PonteConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PonteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PonteConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PONTE_WHATSAPP_COUNTRY_PREFIX` must map
/// to `whatsapp.country_prefix`, not `whatsapp.country.prefix`.
fn env_provider() -> Env {
    Env::prefixed("PONTE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PONTE_BRIDGE_LOG_LEVEL -> "bridge_log_level"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bridge_", "bridge.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("mail_", "mail.", 1)
            .replacen("cors_", "cors.", 1);
        mapped.into()
    })
}
