// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and digit-only country prefixes.

use crate::diagnostic::ConfigError;
use crate::model::PonteConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PonteConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.bridge.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "bridge.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("bridge.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.bridge.port == 0 {
        errors.push(ConfigError::Validation {
            message: "bridge.port must be non-zero".to_string(),
        });
    }

    if config.whatsapp.runtime_command.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "whatsapp.runtime_command must not be empty".to_string(),
        });
    }

    if config.whatsapp.session_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "whatsapp.session_dir must not be empty".to_string(),
        });
    }

    let prefix = &config.whatsapp.country_prefix;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "whatsapp.country_prefix must be a non-empty digit string, got `{prefix}`"
            ),
        });
    }

    if config.whatsapp.reconnect_delay_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "whatsapp.reconnect_delay_secs must be at least 1".to_string(),
        });
    }

    if config.mail.store_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "mail.store_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
