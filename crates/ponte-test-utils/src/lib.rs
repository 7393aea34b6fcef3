// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Ponte bridge.

pub mod mock_client;

pub use mock_client::MockAutomationClient;
