// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP facade and WebSocket status broadcaster for the Ponte bridge.
//!
//! Translates external HTTP calls into channel adapter operations and pushes
//! real-time connection-state transitions to WebSocket subscribers. Every
//! response carries negotiated CORS/Private-Network-Access headers so LAN
//! browser frontends can reach the bridge.

pub mod cors;
pub mod handlers;
pub mod qr;
pub mod server;
pub mod ws;

pub use cors::CorsPolicy;
pub use server::{BridgeState, ServerConfig, build_router, start_server};
