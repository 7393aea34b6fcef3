// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Ponte bridge.

pub mod adapter;
pub mod automation;

pub use adapter::BridgeAdapter;
pub use automation::AutomationClient;
