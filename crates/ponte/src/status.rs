// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ponte status` command implementation.
//!
//! Polls the bridge's status endpoint to display channel state. Falls back
//! gracefully when the bridge is not running.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use ponte_config::PonteConfig;
use ponte_core::PonteError;

/// Status endpoint response from the bridge.
#[derive(Debug, Deserialize)]
struct BridgeStatus {
    messaging: String,
    mail: String,
    server: String,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub running: bool,
    pub messaging: Option<String>,
    pub mail: Option<String>,
    pub server: Option<String>,
    pub bridge_host: String,
    pub bridge_port: u16,
}

/// Run the `ponte status` command.
///
/// Connects to the status endpoint on the bridge and displays channel state.
/// If `--json` is passed, outputs structured JSON for scripting.
pub async fn run_status(config: &PonteConfig, json: bool) -> Result<(), PonteError> {
    // An all-interfaces bind address is not a dialable host.
    let host = if config.bridge.host == "0.0.0.0" {
        "127.0.0.1"
    } else {
        config.bridge.host.as_str()
    };
    let url = format!("http://{host}:{}/status", config.bridge.port);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| PonteError::Internal(format!("failed to build HTTP client: {e}")))?;

    let status = match client.get(&url).send().await {
        Ok(response) => match response.json::<BridgeStatus>().await {
            Ok(status) => Some(status),
            Err(e) => {
                return Err(PonteError::Internal(format!(
                    "bridge answered with an unexpected body: {e}"
                )));
            }
        },
        Err(_) => None,
    };

    let report = StatusReport {
        running: status.is_some(),
        messaging: status.as_ref().map(|s| s.messaging.clone()),
        mail: status.as_ref().map(|s| s.mail.clone()),
        server: status.as_ref().map(|s| s.server.clone()),
        bridge_host: host.to_string(),
        bridge_port: config.bridge.port,
    };

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| PonteError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    match status {
        Some(status) => {
            println!("ponte bridge at {host}:{}", config.bridge.port);
            println!("  server:    {}", status.server);
            println!("  whatsapp:  {}", status.messaging);
            println!("  mail:      {}", status.mail);
        }
        None => {
            println!(
                "ponte bridge at {host}:{} is not responding",
                config.bridge.port
            );
            println!("  start it with: ponte serve");
        }
    }

    Ok(())
}
