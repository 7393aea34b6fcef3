// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection state machine for the messaging channel.
//!
//! All state mutation funnels through [`ChannelStatus::apply_event`], so the
//! machine is testable without a live automation runtime and invalid
//! transitions cannot be introduced by ad hoc callback code.

use ponte_core::{ClientEvent, ConnectionState, StatusEvent};
use tracing::warn;

/// Current state of the messaging channel plus the pending QR challenge.
///
/// The challenge is only ever present while the state is
/// [`ConnectionState::QrReady`]; every transition out of that state clears it.
#[derive(Debug, Clone)]
pub struct ChannelStatus {
    state: ConnectionState,
    qr: Option<String>,
}

impl ChannelStatus {
    /// A fresh, unauthenticated channel.
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            qr: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn qr(&self) -> Option<&str> {
        self.qr.as_deref()
    }

    /// A broadcastable snapshot of the current state.
    pub fn snapshot(&self) -> StatusEvent {
        StatusEvent {
            status: self.state,
            qr: self.qr.clone(),
        }
    }

    /// Applies a client event and returns the resulting snapshot when the
    /// observable state changed. Invalid or redundant events return `None`
    /// and leave the machine untouched.
    pub fn apply_event(&mut self, event: ClientEvent) -> Option<StatusEvent> {
        match event {
            ClientEvent::Qr(challenge) => {
                if self.state == ConnectionState::Ready {
                    // The runtime must not issue challenges for a live session.
                    warn!("ignoring QR challenge while connected");
                    return None;
                }
                self.state = ConnectionState::QrReady;
                self.qr = Some(challenge);
                Some(self.snapshot())
            }
            ClientEvent::Ready => {
                if self.state == ConnectionState::Ready {
                    return None;
                }
                self.state = ConnectionState::Ready;
                self.qr = None;
                Some(self.snapshot())
            }
            ClientEvent::AuthFailure(reason) => {
                if self.state == ConnectionState::Ready {
                    warn!(reason = %reason, "ignoring auth failure for an authenticated session");
                    return None;
                }
                warn!(reason = %reason, "authentication failed");
                self.to_disconnected()
            }
            ClientEvent::Disconnected(reason) => {
                warn!(reason = %reason, "messaging channel disconnected");
                self.to_disconnected()
            }
        }
    }

    /// Returns the machine to `Disconnected`, clearing any pending
    /// challenge. Used both by event application and by re-initialization.
    pub fn reset(&mut self) -> Option<StatusEvent> {
        self.to_disconnected()
    }

    fn to_disconnected(&mut self) -> Option<StatusEvent> {
        if self.state == ConnectionState::Disconnected && self.qr.is_none() {
            return None;
        }
        self.state = ConnectionState::Disconnected;
        self.qr = None;
        Some(self.snapshot())
    }
}

impl Default for ChannelStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected_without_challenge() {
        let status = ChannelStatus::new();
        assert_eq!(status.state(), ConnectionState::Disconnected);
        assert!(status.qr().is_none());
    }

    #[test]
    fn qr_event_moves_to_qr_ready() {
        let mut status = ChannelStatus::new();
        let event = status.apply_event(ClientEvent::Qr("challenge-1".into())).unwrap();
        assert_eq!(event.status, ConnectionState::QrReady);
        assert_eq!(event.qr.as_deref(), Some("challenge-1"));
        assert_eq!(status.qr(), Some("challenge-1"));
    }

    #[test]
    fn refreshed_qr_replaces_previous_challenge() {
        let mut status = ChannelStatus::new();
        status.apply_event(ClientEvent::Qr("first".into()));
        status.apply_event(ClientEvent::Qr("second".into()));
        assert_eq!(status.qr(), Some("second"));
        assert_eq!(status.state(), ConnectionState::QrReady);
    }

    #[test]
    fn ready_after_qr_clears_challenge() {
        let mut status = ChannelStatus::new();
        status.apply_event(ClientEvent::Qr("challenge".into()));
        let event = status.apply_event(ClientEvent::Ready).unwrap();
        assert_eq!(event.status, ConnectionState::Ready);
        assert!(event.qr.is_none());
        assert!(status.qr().is_none());
        assert_eq!(status.state(), ConnectionState::Ready);
    }

    #[test]
    fn restored_session_goes_straight_to_ready() {
        let mut status = ChannelStatus::new();
        let event = status.apply_event(ClientEvent::Ready).unwrap();
        assert_eq!(event.status, ConnectionState::Ready);
    }

    #[test]
    fn redundant_ready_is_ignored() {
        let mut status = ChannelStatus::new();
        status.apply_event(ClientEvent::Ready);
        assert!(status.apply_event(ClientEvent::Ready).is_none());
    }

    #[test]
    fn qr_while_ready_is_rejected() {
        let mut status = ChannelStatus::new();
        status.apply_event(ClientEvent::Ready);
        assert!(status.apply_event(ClientEvent::Qr("stale".into())).is_none());
        assert_eq!(status.state(), ConnectionState::Ready);
        assert!(status.qr().is_none());
    }

    #[test]
    fn auth_failure_during_challenge_disconnects() {
        let mut status = ChannelStatus::new();
        status.apply_event(ClientEvent::Qr("challenge".into()));
        let event = status
            .apply_event(ClientEvent::AuthFailure("scan rejected".into()))
            .unwrap();
        assert_eq!(event.status, ConnectionState::Disconnected);
        assert!(status.qr().is_none());
    }

    #[test]
    fn disconnect_from_ready_disconnects() {
        let mut status = ChannelStatus::new();
        status.apply_event(ClientEvent::Ready);
        let event = status
            .apply_event(ClientEvent::Disconnected("remote logout".into()))
            .unwrap();
        assert_eq!(event.status, ConnectionState::Disconnected);
    }

    #[test]
    fn redundant_disconnect_is_silent() {
        let mut status = ChannelStatus::new();
        assert!(status
            .apply_event(ClientEvent::Disconnected("already down".into()))
            .is_none());
    }

    #[test]
    fn reset_clears_pending_challenge() {
        let mut status = ChannelStatus::new();
        status.apply_event(ClientEvent::Qr("challenge".into()));
        let event = status.reset().unwrap();
        assert_eq!(event.status, ConnectionState::Disconnected);
        assert!(event.qr.is_none());
        // a second reset has nothing to report
        assert!(status.reset().is_none());
    }
}
