// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ponte serve` command implementation.
//!
//! Wires the channel adapters to the HTTP facade and runs until a signal
//! arrives. Startup order matters: both adapters finish their disk reads
//! (mail transport config, session store) before the listener binds, so no
//! request can race the boot-time reads.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{info, warn};

use ponte_config::PonteConfig;
use ponte_core::{BridgeAdapter, PonteError};
use ponte_gateway::{BridgeState, CorsPolicy, ServerConfig, start_server};
use ponte_mail::{ConfigStore, MailChannel};
use ponte_whatsapp::client::RuntimeClient;
use ponte_whatsapp::session::SessionStore;
use ponte_whatsapp::{WhatsappChannel, WhatsappChannelConfig};

use crate::shutdown;

/// Runs the `ponte serve` command.
pub async fn run_serve(config: PonteConfig) -> Result<(), PonteError> {
    init_tracing(&config.bridge.log_level);

    info!("starting ponte serve");

    // Status feed shared by the adapter (producer) and WebSocket subscribers.
    let (status_tx, _) = broadcast::channel(32);

    // Session store must exist before the automation runtime launches.
    let session = SessionStore::new(&config.whatsapp.session_dir);
    session.ensure().await?;
    if session.has_credentials().await {
        info!("existing session credentials found; expecting silent restore");
    } else {
        info!("no session credentials; first connect will issue a QR challenge");
    }

    let client = Arc::new(RuntimeClient::new(
        config.whatsapp.runtime_command.clone(),
        config.whatsapp.runtime_args.clone(),
        session.path().to_path_buf(),
    ));
    let whatsapp = Arc::new(WhatsappChannel::new(
        client,
        WhatsappChannelConfig {
            country_prefix: config.whatsapp.country_prefix.clone(),
            reconnect_delay: Duration::from_secs(config.whatsapp.reconnect_delay_secs),
            send_timeout: Duration::from_secs(config.whatsapp.send_timeout_secs),
        },
        status_tx.clone(),
    ));

    // Boot-time disk read happens here, before the facade accepts requests.
    let mail = Arc::new(
        MailChannel::load(
            ConfigStore::new(&config.mail.store_path),
            Duration::from_secs(config.mail.send_timeout_secs),
        )
        .await,
    );

    // A runtime that cannot launch leaves messaging offline; the facade
    // still starts and reports DISCONNECTED.
    whatsapp.initialize().await;

    let state = BridgeState {
        whatsapp: Arc::clone(&whatsapp),
        mail: Arc::clone(&mail),
        status_tx,
    };

    let cancel = shutdown::install_signal_handler();

    let server_config = ServerConfig {
        host: config.bridge.host.clone(),
        port: config.bridge.port,
        cors: CorsPolicy {
            allow_any_origin_with_credentials: config.cors.allow_any_origin_with_credentials,
            allowed_origins: config.cors.allowed_origins.clone(),
        },
    };

    start_server(&server_config, state, cancel).await?;

    if let Err(e) = whatsapp.shutdown().await {
        warn!(error = %e, "whatsapp adapter shutdown failed");
    }

    info!("ponte serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ponte={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
