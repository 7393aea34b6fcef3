// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock automation client for deterministic testing.
//!
//! `MockAutomationClient` implements `AutomationClient` with injectable
//! lifecycle events and captured outbound sends for assertion in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use ponte_core::{AutomationClient, ClientEvent, PonteError};

/// A scripted stand-in for the browser-automation runtime.
///
/// Tests drive the connection state machine by calling [`emit`] with
/// synthetic [`ClientEvent`]s; sends are recorded instead of delivered.
///
/// [`emit`]: MockAutomationClient::emit
pub struct MockAutomationClient {
    events_tx: Arc<Mutex<Option<mpsc::Sender<ClientEvent>>>>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
    starts: Arc<Mutex<u32>>,
    fail_start: bool,
    send_error: Option<String>,
}

impl MockAutomationClient {
    /// Create a mock that starts cleanly and accepts every send.
    pub fn new() -> Self {
        Self {
            events_tx: Arc::new(Mutex::new(None)),
            sent: Arc::new(Mutex::new(Vec::new())),
            starts: Arc::new(Mutex::new(0)),
            fail_start: false,
            send_error: None,
        }
    }

    /// Make every `start()` call fail, simulating a runtime that cannot
    /// launch.
    pub fn with_start_error(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Make every `send_text()` call fail with the given message.
    pub fn with_send_error(mut self, message: &str) -> Self {
        self.send_error = Some(message.to_string());
        self
    }

    /// Deliver a synthetic lifecycle event to the adapter under test.
    ///
    /// Panics if the client was never started; that is always a test bug.
    pub async fn emit(&self, event: ClientEvent) {
        let guard = self.events_tx.lock().await;
        let tx = guard.as_ref().expect("mock client was not started");
        tx.send(event).await.expect("adapter dropped its event loop");
    }

    /// All `(target, body)` pairs passed to `send_text()`.
    pub async fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    /// Number of recorded sends.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Number of times `start()` was invoked (including failed attempts).
    pub async fn start_count(&self) -> u32 {
        *self.starts.lock().await
    }
}

impl Default for MockAutomationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AutomationClient for MockAutomationClient {
    async fn start(&self, events: mpsc::Sender<ClientEvent>) -> Result<(), PonteError> {
        *self.starts.lock().await += 1;
        if self.fail_start {
            return Err(PonteError::Channel {
                message: "mock runtime refused to launch".into(),
                source: None,
            });
        }
        *self.events_tx.lock().await = Some(events);
        Ok(())
    }

    async fn send_text(&self, target: &str, body: &str) -> Result<(), PonteError> {
        if let Some(ref message) = self.send_error {
            return Err(PonteError::Channel {
                message: message.clone(),
                source: None,
            });
        }
        self.sent
            .lock()
            .await
            .push((target.to_string(), body.to_string()));
        Ok(())
    }

    async fn stop(&self) -> Result<(), PonteError> {
        self.events_tx.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emitted_events_reach_the_receiver() {
        let mock = MockAutomationClient::new();
        let (tx, mut rx) = mpsc::channel(8);
        mock.start(tx).await.unwrap();

        mock.emit(ClientEvent::Ready).await;
        assert_eq!(rx.recv().await, Some(ClientEvent::Ready));
    }

    #[tokio::test]
    async fn sends_are_recorded() {
        let mock = MockAutomationClient::new();
        mock.send_text("5511987654321@c.us", "hello").await.unwrap();
        assert_eq!(mock.sent_count().await, 1);
        assert_eq!(
            mock.sent_messages().await[0],
            ("5511987654321@c.us".to_string(), "hello".to_string())
        );
    }

    #[tokio::test]
    async fn start_error_mode_rejects_launch() {
        let mock = MockAutomationClient::new().with_start_error();
        let (tx, _rx) = mpsc::channel(8);
        assert!(mock.start(tx).await.is_err());
        assert_eq!(mock.start_count().await, 1);
    }

    #[tokio::test]
    async fn send_error_mode_rejects_delivery() {
        let mock = MockAutomationClient::new().with_send_error("boom");
        let err = mock.send_text("x@c.us", "hi").await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(mock.sent_count().await, 0);
    }

    #[tokio::test]
    async fn stop_disconnects_the_event_channel() {
        let mock = MockAutomationClient::new();
        let (tx, _rx) = mpsc::channel(8);
        mock.start(tx).await.unwrap();
        mock.stop().await.unwrap();
        assert!(mock.events_tx.lock().await.is_none());
    }
}
