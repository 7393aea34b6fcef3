// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ponte local integration bridge.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Ponte workspace. Channel adapters
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PonteError;
pub use types::{
    ChannelType, ClientEvent, ConnectionState, HealthStatus, MailStatus, ServerStatus,
    StatusEvent,
};

// Re-export adapter traits at crate root.
pub use traits::{AutomationClient, BridgeAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ponte_error_has_all_variants() {
        // Verify all 7 error variants exist and can be constructed.
        let _config = PonteError::Config("test".into());
        let _channel = PonteError::Channel {
            message: "test".into(),
            source: None,
        };
        let _mail = PonteError::Mail {
            message: "test".into(),
            source: None,
        };
        let _session = PonteError::Session {
            source: Box::new(std::io::Error::other("test")),
        };
        let _port = PonteError::PortInUse {
            addr: "0.0.0.0:3001".into(),
        };
        let _timeout = PonteError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = PonteError::Internal("test".into());
    }

    #[test]
    fn error_messages_carry_context() {
        let err = PonteError::Channel {
            message: "runtime unreachable".into(),
            source: None,
        };
        assert!(err.to_string().contains("runtime unreachable"));

        let err = PonteError::PortInUse {
            addr: "0.0.0.0:3001".into(),
        };
        assert!(err.to_string().contains("0.0.0.0:3001"));
    }

    #[test]
    fn adapter_traits_are_object_safe() {
        // If either trait loses object safety this stops compiling.
        fn _assert_bridge(_: &dyn BridgeAdapter) {}
        fn _assert_automation(_: &dyn AutomationClient) {}
    }
}
