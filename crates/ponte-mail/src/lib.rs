// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound mail channel adapter for the Ponte bridge.
//!
//! Delivers email over a configurable SMTP transport via lettre. The
//! transport is rebuilt per send from the current configuration, so a
//! `configure` call takes effect immediately with no connection pooling to
//! invalidate. Delivery is never retried; callers receive the transport's
//! native error.

pub mod store;

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::RwLock;
use tracing::{debug, info};

use ponte_core::{BridgeAdapter, ChannelType, HealthStatus, MailStatus, PonteError};

pub use crate::store::{ConfigStore, MailAuth, MailTransportConfig};

/// Mail channel adapter.
///
/// Holds the current transport configuration in memory and mirrors every
/// replacement to the JSON store. Configuration is structural only; a bad
/// host or password is discovered at send time.
pub struct MailChannel {
    store: ConfigStore,
    config: RwLock<MailTransportConfig>,
    send_timeout: Duration,
}

impl MailChannel {
    /// Open the channel, reloading any persisted configuration.
    ///
    /// Runs before the HTTP facade starts accepting requests, so there is no
    /// read/write race on the store during boot.
    pub async fn load(store: ConfigStore, send_timeout: Duration) -> Self {
        let config = store.load_or_default().await;
        if config.is_configured() {
            info!(host = config.host.as_str(), "mail transport restored from disk");
        } else {
            debug!("no mail transport configured yet");
        }
        Self {
            store,
            config: RwLock::new(config),
            send_timeout,
        }
    }

    /// Replace the whole transport configuration and persist it.
    pub async fn configure(&self, config: MailTransportConfig) -> Result<(), PonteError> {
        {
            let mut current = self.config.write().await;
            *current = config.clone();
        }
        self.store.persist(&config).await?;
        info!(host = config.host.as_str(), port = config.port, "mail transport configured");
        Ok(())
    }

    /// Copy of the active configuration.
    pub async fn current(&self) -> MailTransportConfig {
        self.config.read().await.clone()
    }

    pub async fn is_configured(&self) -> bool {
        self.config.read().await.is_configured()
    }

    pub async fn status(&self) -> MailStatus {
        if self.is_configured().await {
            MailStatus::Configured
        } else {
            MailStatus::MissingCredentials
        }
    }

    /// Deliver one HTML email.
    ///
    /// Fails fast when no credentials are configured; otherwise builds a
    /// fresh transport and attempts delivery under the bounded timeout.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        from_name: &str,
    ) -> Result<(), PonteError> {
        let config = self.config.read().await.clone();
        if !config.is_configured() {
            return Err(PonteError::Mail {
                message: "SMTP transport is not configured".into(),
                source: None,
            });
        }

        let from: Mailbox = format!("{from_name} <{}>", config.auth.user)
            .parse()
            .map_err(|e| PonteError::Mail {
                message: format!("invalid sender address: {e}"),
                source: None,
            })?;
        let recipient: Mailbox = to.parse().map_err(|e| PonteError::Mail {
            message: format!("invalid recipient address `{to}`: {e}"),
            source: None,
        })?;

        let message = Message::builder()
            .from(from)
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| PonteError::Mail {
                message: format!("failed to build message: {e}"),
                source: Some(Box::new(e)),
            })?;

        let transport = build_transport(&config)?;

        match tokio::time::timeout(self.send_timeout, transport.send(message)).await {
            Ok(Ok(_)) => {
                debug!(to, "email delivered");
                Ok(())
            }
            Ok(Err(e)) => Err(PonteError::Mail {
                message: e.to_string(),
                source: Some(Box::new(e)),
            }),
            Err(_) => Err(PonteError::Timeout {
                duration: self.send_timeout,
            }),
        }
    }
}

/// Build a one-shot SMTP transport from the configuration.
///
/// `secure` selects implicit TLS from the first byte; otherwise the
/// connection upgrades via STARTTLS, which is what submission ports expect.
fn build_transport(
    config: &MailTransportConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, PonteError> {
    let builder = if config.secure {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
    }
    .map_err(|e| PonteError::Mail {
        message: format!("failed to build SMTP transport for `{}`: {e}", config.host),
        source: Some(Box::new(e)),
    })?;

    Ok(builder
        .port(config.port)
        .credentials(Credentials::new(
            config.auth.user.clone(),
            config.auth.pass.clone(),
        ))
        .build())
}

#[async_trait]
impl BridgeAdapter for MailChannel {
    fn name(&self) -> &str {
        "mail"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn channel_type(&self) -> ChannelType {
        ChannelType::Mail
    }

    async fn health_check(&self) -> Result<HealthStatus, PonteError> {
        Ok(if self.is_configured().await {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy("missing credentials".to_string())
        })
    }

    async fn shutdown(&self) -> Result<(), PonteError> {
        // Transports are per-send; nothing to tear down.
        Ok(())
    }
}
