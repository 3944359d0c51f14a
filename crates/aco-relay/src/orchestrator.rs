// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One request/response cycle for one user message.

use std::sync::Arc;

use aco_core::{
    AcoError, ChannelAdapter, InboundEvent, OutboundMessage, ProviderAdapter, ProviderRequest,
    Role,
};
use tracing::{debug, error, warn};

use crate::chunker;
use crate::history::ConversationStore;
use crate::settings::DestinationConfigStore;

/// What the orchestrator delivered for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The backend answered and every segment was sent.
    Replied { segments: usize },
    /// The backend failed and the error reply was sent instead.
    BackendFailed,
}

/// Drives history, the generation backend and ordered segment emission.
pub struct ConversationOrchestrator {
    history: Arc<ConversationStore>,
    settings: Arc<DestinationConfigStore>,
    provider: Arc<dyn ProviderAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    max_message_length: usize,
    error_reply: String,
}

impl ConversationOrchestrator {
    pub fn new(
        history: Arc<ConversationStore>,
        settings: Arc<DestinationConfigStore>,
        provider: Arc<dyn ProviderAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        max_message_length: usize,
        error_reply: impl Into<String>,
    ) -> Self {
        Self {
            history,
            settings,
            provider,
            channel,
            max_message_length,
            error_reply: error_reply.into(),
        }
    }

    /// Segment size: the configured limit, lowered to the transport's own
    /// limit when it advertises a smaller one.
    pub fn segment_length(&self) -> usize {
        match self.channel.capabilities().max_message_length {
            Some(limit) => self.max_message_length.min(limit),
            None => self.max_message_length,
        }
    }

    /// Answers `event`.
    ///
    /// A backend failure is recovered here: the user turn stays in the
    /// history, no model turn is added and one error reply is sent. Transport
    /// failures while sending segments are returned to the caller.
    pub async fn respond(&self, event: &InboundEvent) -> Result<ReplyOutcome, AcoError> {
        let user_id = event.author_id.as_str();

        if self.channel.capabilities().supports_typing
            && let Err(e) = self.channel.send_typing(&event.channel_id).await
        {
            debug!(error = %e, channel_id = event.channel_id.as_str(), "failed to send typing indicator");
        }

        self.history.append(user_id, Role::User, event.text.as_str());
        let request = ProviderRequest {
            system_prompt: self
                .settings
                .personality_for(event.destination_id.as_deref()),
            history: self.history.history_excluding_last(user_id),
            prompt: event.text.clone(),
        };

        debug!(
            user_id,
            context_turns = request.history.len(),
            "calling generation backend"
        );

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(user_id, error = %e, "generation backend failed");
                self.send_error_reply(event).await;
                return Ok(ReplyOutcome::BackendFailed);
            }
        };

        self.history
            .append(user_id, Role::Model, response.text.as_str());

        let segments = chunker::split(&response.text, self.segment_length());
        let count = segments.len();
        // Each send resolves before the next starts so segments arrive in order.
        for segment in segments {
            self.channel
                .send(OutboundMessage::reply_to(event, segment))
                .await?;
        }

        debug!(user_id, segments = count, "reply delivered");
        Ok(ReplyOutcome::Replied { segments: count })
    }

    /// Sends the configured error text as a reply to `event`.
    pub async fn send_error_reply(&self, event: &InboundEvent) {
        let reply = OutboundMessage::reply_to(event, self.error_reply.as_str());
        if let Err(e) = self.channel.send(reply).await {
            error!(
                error = %e,
                channel_id = event.channel_id.as_str(),
                "failed to send error reply"
            );
        }
    }
}
