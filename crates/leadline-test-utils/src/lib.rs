// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Leadline integration tests.
//!
//! Provides a mock channel and a test harness for fast, deterministic,
//! CI-runnable tests without a Telegram connection.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock chat channel with event injection and capture
//! - [`TestHarness`] - Flow engine over a temp SQLite database

pub mod harness;
pub mod mock_channel;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_channel::MockChannel;
