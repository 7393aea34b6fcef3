// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp messaging channel adapter for the Ponte bridge.
//!
//! Wraps the browser-automation runtime behind a narrow interface with
//! observable connection state: the rest of the bridge sees a simple
//! request/response send capability plus a stream of status transitions.

pub mod client;
pub mod phone;
pub mod session;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use ponte_core::{
    AutomationClient, BridgeAdapter, ChannelType, ClientEvent, ConnectionState, HealthStatus,
    PonteError, StatusEvent,
};

use crate::state::ChannelStatus;

/// WhatsApp channel settings.
///
/// Mirrors the `whatsapp` section of `PonteConfig` to avoid a dependency on
/// the config crate from this adapter crate.
#[derive(Debug, Clone)]
pub struct WhatsappChannelConfig {
    /// Country calling code for short-number qualification.
    pub country_prefix: String,
    /// Delay before the single reconnect attempt after a remote disconnect.
    pub reconnect_delay: Duration,
    /// Upper bound on a single send operation.
    pub send_timeout: Duration,
}

impl Default for WhatsappChannelConfig {
    fn default() -> Self {
        Self {
            country_prefix: "55".to_string(),
            reconnect_delay: Duration::from_secs(5),
            send_timeout: Duration::from_secs(30),
        }
    }
}

/// WhatsApp channel adapter.
///
/// Owns the automation client and the connection state machine. Every
/// accepted state transition is pushed on the status broadcast channel so
/// connected observers see it without polling.
pub struct WhatsappChannel {
    client: Arc<dyn AutomationClient>,
    config: WhatsappChannelConfig,
    status: Arc<Mutex<ChannelStatus>>,
    status_tx: broadcast::Sender<StatusEvent>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl WhatsappChannel {
    pub fn new(
        client: Arc<dyn AutomationClient>,
        config: WhatsappChannelConfig,
        status_tx: broadcast::Sender<StatusEvent>,
    ) -> Self {
        Self {
            client,
            config,
            status: Arc::new(Mutex::new(ChannelStatus::new())),
            status_tx,
            supervisor: Mutex::new(None),
        }
    }

    /// Starts (or restarts) the automation client and the supervisor task
    /// that drives the state machine.
    ///
    /// A client that fails to launch leaves the channel `Disconnected` and
    /// the process running: the facade keeps answering status requests even
    /// when messaging never comes up.
    pub async fn initialize(&self) {
        // Stop any previous incarnation so repeated calls are safe.
        if let Some(task) = self.supervisor.lock().await.take() {
            task.abort();
        }
        apply_reset(&self.status, &self.status_tx).await;

        let (events_tx, events_rx) = mpsc::channel(32);
        if let Err(e) = self.client.start(events_tx).await {
            error!(error = %e, "automation client failed to start; channel stays offline");
            return;
        }

        let task = tokio::spawn(supervise(
            Arc::clone(&self.client),
            self.config.clone(),
            Arc::clone(&self.status),
            self.status_tx.clone(),
            events_rx,
        ));
        *self.supervisor.lock().await = Some(task);
        info!("whatsapp channel initializing");
    }

    /// Snapshot of the current connection state and pending QR challenge.
    pub async fn snapshot(&self) -> StatusEvent {
        self.status.lock().await.snapshot()
    }

    /// Sends a text message to a phone number.
    ///
    /// Fails fast unless the channel is `Ready`. The number is qualified
    /// with the country prefix and addressed on the network before handing
    /// off to the automation client under a bounded timeout.
    pub async fn send_message(&self, target: &str, content: &str) -> Result<(), PonteError> {
        {
            let status = self.status.lock().await;
            if status.state() != ConnectionState::Ready {
                return Err(PonteError::Channel {
                    message: "WhatsApp client is not connected".into(),
                    source: None,
                });
            }
        }

        let jid = phone::canonical_jid(target, &self.config.country_prefix);
        match tokio::time::timeout(
            self.config.send_timeout,
            self.client.send_text(&jid, content),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(PonteError::Timeout {
                duration: self.config.send_timeout,
            }),
        }
    }
}

/// Feed the state machine with client events, broadcasting each accepted
/// transition.
///
/// A disconnect event triggers one client relaunch after the configured
/// delay; if that relaunch fails, the channel stays down until an operator
/// intervenes.
async fn supervise(
    client: Arc<dyn AutomationClient>,
    config: WhatsappChannelConfig,
    status: Arc<Mutex<ChannelStatus>>,
    status_tx: broadcast::Sender<StatusEvent>,
    mut events_rx: mpsc::Receiver<ClientEvent>,
) {
    loop {
        let mut lost_connection = false;

        while let Some(event) = events_rx.recv().await {
            let disconnected = matches!(event, ClientEvent::Disconnected(_));

            let transition = {
                let mut status = status.lock().await;
                status.apply_event(event)
            };
            if let Some(snapshot) = transition {
                info!(status = %snapshot.status, "whatsapp state transition");
                let _ = status_tx.send(snapshot);
            }

            if disconnected {
                lost_connection = true;
                break;
            }
        }

        if !lost_connection {
            // The client went away without a disconnect event (adapter
            // shutdown); nothing to recover.
            return;
        }

        warn!(
            delay_secs = config.reconnect_delay.as_secs(),
            "scheduling reconnect"
        );
        tokio::time::sleep(config.reconnect_delay).await;
        apply_reset(&status, &status_tx).await;

        let (events_tx, new_rx) = mpsc::channel(32);
        match client.start(events_tx).await {
            Ok(()) => {
                info!("whatsapp channel reconnecting");
                events_rx = new_rx;
            }
            Err(e) => {
                error!(error = %e, "reconnect failed; channel stays offline");
                return;
            }
        }
    }
}

/// Return the machine to `Disconnected`, broadcasting if anything changed.
async fn apply_reset(
    status: &Arc<Mutex<ChannelStatus>>,
    status_tx: &broadcast::Sender<StatusEvent>,
) {
    let mut status = status.lock().await;
    if let Some(event) = status.reset() {
        let _ = status_tx.send(event);
    }
}

#[async_trait]
impl BridgeAdapter for WhatsappChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn channel_type(&self) -> ChannelType {
        ChannelType::Messaging
    }

    async fn health_check(&self) -> Result<HealthStatus, PonteError> {
        let status = self.status.lock().await;
        Ok(match status.state() {
            ConnectionState::Ready => HealthStatus::Healthy,
            ConnectionState::QrReady => {
                HealthStatus::Degraded("awaiting QR authentication".to_string())
            }
            ConnectionState::Disconnected => {
                HealthStatus::Unhealthy("channel disconnected".to_string())
            }
        })
    }

    async fn shutdown(&self) -> Result<(), PonteError> {
        if let Some(task) = self.supervisor.lock().await.take() {
            task.abort();
        }
        self.client.stop().await
    }
}

#[cfg(test)]
mod tests {
    use ponte_test_utils::MockAutomationClient;

    use super::*;

    fn make_channel(
        mock: Arc<MockAutomationClient>,
        config: WhatsappChannelConfig,
    ) -> (Arc<WhatsappChannel>, broadcast::Receiver<StatusEvent>) {
        let (status_tx, status_rx) = broadcast::channel(16);
        let channel = Arc::new(WhatsappChannel::new(mock, config, status_tx));
        (channel, status_rx)
    }

    #[tokio::test]
    async fn send_is_rejected_while_disconnected() {
        let mock = Arc::new(MockAutomationClient::new());
        let (channel, _rx) = make_channel(mock.clone(), WhatsappChannelConfig::default());
        channel.initialize().await;

        let err = channel.send_message("11987654321", "hi").await.unwrap_err();
        assert!(err.to_string().contains("not connected"));
        assert_eq!(mock.sent_count().await, 0);
    }

    #[tokio::test]
    async fn send_is_rejected_while_awaiting_scan() {
        let mock = Arc::new(MockAutomationClient::new());
        let (channel, mut rx) = make_channel(mock.clone(), WhatsappChannelConfig::default());
        channel.initialize().await;

        mock.emit(ClientEvent::Qr("challenge".into())).await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.status, ConnectionState::QrReady);

        assert!(channel.send_message("11987654321", "hi").await.is_err());
        assert_eq!(mock.sent_count().await, 0);
    }

    #[tokio::test]
    async fn ready_channel_sends_to_canonical_target() {
        let mock = Arc::new(MockAutomationClient::new());
        let (channel, mut rx) = make_channel(mock.clone(), WhatsappChannelConfig::default());
        channel.initialize().await;

        mock.emit(ClientEvent::Ready).await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.status, ConnectionState::Ready);

        channel.send_message("11987654321", "hi").await.unwrap();
        let sent = mock.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "5511987654321@c.us");
        assert_eq!(sent[0].1, "hi");
    }

    #[tokio::test]
    async fn qr_then_ready_leaves_no_stale_challenge() {
        let mock = Arc::new(MockAutomationClient::new());
        let (channel, mut rx) = make_channel(mock.clone(), WhatsappChannelConfig::default());
        channel.initialize().await;

        mock.emit(ClientEvent::Qr("challenge".into())).await;
        rx.recv().await.unwrap();
        mock.emit(ClientEvent::Ready).await;
        rx.recv().await.unwrap();

        let snapshot = channel.snapshot().await;
        assert_eq!(snapshot.status, ConnectionState::Ready);
        assert!(snapshot.qr.is_none());
    }

    #[tokio::test]
    async fn transport_failure_surfaces_to_caller() {
        let mock = Arc::new(MockAutomationClient::new().with_send_error("socket hang up"));
        let (channel, mut rx) = make_channel(mock.clone(), WhatsappChannelConfig::default());
        channel.initialize().await;
        mock.emit(ClientEvent::Ready).await;
        rx.recv().await.unwrap();

        let err = channel.send_message("11987654321", "hi").await.unwrap_err();
        assert!(err.to_string().contains("socket hang up"));
    }

    #[tokio::test]
    async fn launch_failure_leaves_channel_offline_without_panicking() {
        let mock = Arc::new(MockAutomationClient::new().with_start_error());
        let (channel, _rx) = make_channel(mock.clone(), WhatsappChannelConfig::default());
        channel.initialize().await;

        let snapshot = channel.snapshot().await;
        assert_eq!(snapshot.status, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_schedules_a_single_reconnect() {
        let mock = Arc::new(MockAutomationClient::new());
        let config = WhatsappChannelConfig {
            reconnect_delay: Duration::from_millis(10),
            ..WhatsappChannelConfig::default()
        };
        let (channel, mut rx) = make_channel(mock.clone(), config);
        channel.initialize().await;
        assert_eq!(mock.start_count().await, 1);

        mock.emit(ClientEvent::Ready).await;
        rx.recv().await.unwrap();
        mock.emit(ClientEvent::Disconnected("remote logout".into()))
            .await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.status, ConnectionState::Disconnected);

        // The reconnect fires once after the configured delay.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(mock.start_count().await, 2);
    }

    #[tokio::test]
    async fn auth_failure_does_not_reconnect() {
        let mock = Arc::new(MockAutomationClient::new());
        let config = WhatsappChannelConfig {
            reconnect_delay: Duration::from_millis(10),
            ..WhatsappChannelConfig::default()
        };
        let (channel, mut rx) = make_channel(mock.clone(), config);
        channel.initialize().await;
        assert_eq!(mock.start_count().await, 1);

        mock.emit(ClientEvent::Qr("challenge".into())).await;
        rx.recv().await.unwrap();
        mock.emit(ClientEvent::AuthFailure("scan rejected".into()))
            .await;
        let event = rx.recv().await.unwrap();
        assert_eq!(event.status, ConnectionState::Disconnected);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(mock.start_count().await, 1);
    }

    #[tokio::test]
    async fn health_check_tracks_connection_state() {
        let mock = Arc::new(MockAutomationClient::new());
        let (channel, mut rx) = make_channel(mock.clone(), WhatsappChannelConfig::default());
        channel.initialize().await;

        assert!(matches!(
            channel.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));

        mock.emit(ClientEvent::Ready).await;
        rx.recv().await.unwrap();
        assert_eq!(channel.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
