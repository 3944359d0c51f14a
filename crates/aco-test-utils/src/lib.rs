// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Aco integration tests.
//!
//! Provides mock adapters and a harness for fast, deterministic tests
//! without a chat platform or a generation backend.
//!
//! # Components
//!
//! - [`MockProvider`] - scripted generation backend that records requests
//! - [`MockChannel`] - transport with event injection and message capture
//! - [`TestHarness`] - a [`aco_relay::Relay`] wired to both mocks

pub mod events;
pub mod harness;
pub mod mock_channel;
pub mod mock_provider;

pub use events::{group_event, private_event};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_channel::MockChannel;
pub use mock_provider::MockProvider;
