// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for chat platform transports.

use async_trait::async_trait;

use crate::error::AcoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelCapabilities, InboundEvent, MessageId, OutboundMessage};

/// Adapter for the chat platform connection.
///
/// The transport delivers inbound message events, sends outbound text
/// segments, and answers administrative permission queries.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Returns the capabilities supported by this channel.
    fn capabilities(&self) -> ChannelCapabilities;

    /// Establishes a connection to the chat platform.
    async fn connect(&mut self) -> Result<(), AcoError>;

    /// Sends one message. Resolves once the platform accepted it.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, AcoError>;

    /// Receives the next inbound event from the platform.
    async fn receive(&self) -> Result<InboundEvent, AcoError>;

    /// Shows a typing indicator in the given channel.
    async fn send_typing(&self, _channel_id: &str) -> Result<(), AcoError> {
        Ok(())
    }

    /// Returns whether `user_id` administers `destination_id`.
    async fn is_admin(&self, destination_id: &str, user_id: &str) -> Result<bool, AcoError>;
}
