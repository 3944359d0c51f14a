// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end relay testing.
//!
//! `TestHarness` assembles a [`Relay`] over a [`MockChannel`] and a
//! [`MockProvider`] and exposes both mocks for assertions.

use std::sync::Arc;

use aco_config::model::RelayConfig;
use aco_core::{AcoError, InboundEvent};
use aco_relay::{Command, CommandReply, Invocation, Relay, RouteOutcome};

use crate::mock_channel::MockChannel;
use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    config: RelayConfig,
    channel: Option<MockChannel>,
    provider: Option<MockProvider>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            config: RelayConfig::default(),
            channel: None,
            provider: None,
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Set the default persona.
    pub fn with_default_personality(mut self, personality: impl Into<String>) -> Self {
        self.config.default_personality = personality.into();
        self
    }

    /// Set the configured segment length.
    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.config.max_message_length = max;
        self
    }

    /// Replace the whole relay configuration.
    pub fn with_config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a preconfigured channel instead of a default [`MockChannel`].
    pub fn with_channel(mut self, channel: MockChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Use a preconfigured provider. Replaces any mock responses.
    pub fn with_provider(mut self, provider: MockProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build(self) -> TestHarness {
        let provider = Arc::new(match self.provider {
            Some(provider) => provider,
            None => MockProvider::with_responses(self.responses),
        });
        let channel = Arc::new(self.channel.unwrap_or_default());
        let relay = Arc::new(Relay::new(&self.config, channel.clone(), provider.clone()));

        TestHarness {
            relay,
            channel,
            provider,
        }
    }
}

/// A relay wired to mock adapters.
pub struct TestHarness {
    pub relay: Arc<Relay>,
    pub channel: Arc<MockChannel>,
    pub provider: Arc<MockProvider>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Route one event through the relay.
    pub async fn send_message(&self, event: InboundEvent) -> RouteOutcome {
        self.relay.handle_inbound(&event).await
    }

    /// Run `command` as `actor_id`, in `destination_id` or privately.
    pub async fn run_command(
        &self,
        actor_id: &str,
        destination_id: Option<&str>,
        command: Command,
    ) -> Result<CommandReply, AcoError> {
        self.relay
            .execute(Invocation {
                actor_id: actor_id.to_string(),
                destination_id: destination_id.map(str::to_string),
                command,
            })
            .await
    }
}
