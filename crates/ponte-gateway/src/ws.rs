// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket status broadcaster.
//!
//! Every messaging-channel state transition is pushed to all connected
//! sockets as:
//!
//! ```json
//! {"type": "wa_status", "status": "QR_READY", "qr": "<challenge>"}
//! {"type": "wa_status", "status": "READY"}
//! ```
//!
//! Missed events are not replayed: a subscriber that connects after a
//! transition fetches the current picture from `GET /status` and then relies
//! on the stream for changes.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use ponte_core::{ConnectionState, StatusEvent};

use crate::server::BridgeState;

/// Wire frame for a status push.
#[derive(Debug, Serialize)]
struct StatusFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    status: ConnectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    qr: Option<&'a str>,
}

impl<'a> StatusFrame<'a> {
    fn from_event(event: &'a StatusEvent) -> Self {
        Self {
            kind: "wa_status",
            status: event.status,
            qr: event.qr.as_deref(),
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<BridgeState>) -> Response {
    let events = state.status_tx.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, events))
}

/// Forward status events to one connected socket until either side goes away.
async fn handle_socket(socket: WebSocket, mut events: broadcast::Receiver<StatusEvent>) {
    let (mut sender, mut receiver) = socket.split();
    debug!("status subscriber connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let frame = match serde_json::to_string(&StatusFrame::from_event(&event)) {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!(error = %e, "failed to encode status frame");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // The subscriber fell behind; it reconciles via /status.
                    warn!(skipped, "status subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // The stream is push-only; inbound frames are ignored.
                Some(Ok(_)) => {}
            },
        }
    }

    debug!("status subscriber disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_with_challenge_serializes_fully() {
        let event = StatusEvent {
            status: ConnectionState::QrReady,
            qr: Some("challenge".into()),
        };
        let json = serde_json::to_string(&StatusFrame::from_event(&event)).unwrap();
        assert_eq!(
            json,
            r#"{"type":"wa_status","status":"QR_READY","qr":"challenge"}"#
        );
    }

    #[test]
    fn frame_without_challenge_omits_qr() {
        let event = StatusEvent {
            status: ConnectionState::Ready,
            qr: None,
        };
        let json = serde_json::to_string(&StatusFrame::from_event(&event)).unwrap();
        assert_eq!(json, r#"{"type":"wa_status","status":"READY"}"#);
    }
}
