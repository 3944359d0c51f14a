// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the relay.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier the transport assigns to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter plugged into the relay.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
}

/// Speaker of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message exchanged in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

// --- Channel types ---

/// An inbound message event delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Transport-assigned id of the message, used as the reply anchor.
    pub id: String,
    /// Author of the message.
    pub author_id: String,
    /// Whether the author is the relay's own bot account.
    pub is_bot_author: bool,
    /// Group destination (server) the message was posted in.
    /// `None` for a private one-to-one channel.
    pub destination_id: Option<String>,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Raw message text.
    pub text: String,
}

impl InboundEvent {
    /// Returns true when the event came from a private one-to-one channel.
    pub fn is_private(&self) -> bool {
        self.destination_id.is_none()
    }
}

/// An outbound text segment to be delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Channel to deliver to.
    pub channel_id: String,
    /// Group destination owning the channel, `None` for private channels.
    pub destination_id: Option<String>,
    /// Text content, already within the platform size limit.
    pub content: String,
    /// Inbound message id this segment replies to.
    pub reply_to: Option<String>,
}

impl OutboundMessage {
    /// Builds a reply to `event` carrying `content`.
    pub fn reply_to(event: &InboundEvent, content: impl Into<String>) -> Self {
        Self {
            channel_id: event.channel_id.clone(),
            destination_id: event.destination_id.clone(),
            content: content.into(),
            reply_to: Some(event.id.clone()),
        }
    }
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCapabilities {
    /// Whether the transport can display a typing indicator.
    pub supports_typing: bool,
    /// Maximum length of a single outbound message, in characters.
    pub max_message_length: Option<usize>,
}

// --- Provider types ---

/// A request to the generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Persona instruction applied at system level.
    pub system_prompt: String,
    /// Prior turns, oldest first, excluding the active prompt.
    pub history: Vec<Turn>,
    /// The newest user message.
    pub prompt: String,
}

/// A reply from the generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Generated text.
    pub text: String,
    /// Model that produced the reply, when the backend reports it.
    pub model: Option<String>,
}
