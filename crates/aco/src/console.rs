// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal transport used by `aco shell`.
//!
//! Outbound segments are printed to stdout as they are sent. Input is read
//! by the shell itself, so `receive()` is never used.

use aco_config::model::ShellConfig;
use aco_core::traits::{ChannelAdapter, PluginAdapter};
use aco_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundEvent, MessageId, OutboundMessage,
};
use aco_core::AcoError;
use async_trait::async_trait;
use colored::Colorize;

pub struct ConsoleChannel {
    shell: ShellConfig,
    bot_name: String,
}

impl ConsoleChannel {
    pub fn new(shell: ShellConfig, bot_name: impl Into<String>) -> Self {
        Self {
            shell,
            bot_name: bot_name.into(),
        }
    }

    /// Line printed for one outbound segment.
    pub fn format_segment(&self, msg: &OutboundMessage) -> String {
        format!("{} {}", format!("{}>", self.bot_name).cyan().bold(), msg.content)
    }
}

#[async_trait]
impl PluginAdapter for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, AcoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AcoError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for ConsoleChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_typing: true,
            max_message_length: None,
        }
    }

    async fn connect(&mut self) -> Result<(), AcoError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, AcoError> {
        println!("{}", self.format_segment(&msg));
        Ok(MessageId(uuid::Uuid::new_v4().to_string()))
    }

    async fn receive(&self) -> Result<InboundEvent, AcoError> {
        Err(AcoError::channel(
            "console input is read by the shell, not received",
        ))
    }

    async fn send_typing(&self, _channel_id: &str) -> Result<(), AcoError> {
        println!("{}", format!("{} is typing...", self.bot_name).dimmed());
        Ok(())
    }

    /// Only the configured shell user can be an administrator, and only when
    /// `shell.admin` is set.
    async fn is_admin(&self, _destination_id: &str, user_id: &str) -> Result<bool, AcoError> {
        Ok(self.shell.admin && user_id == self.shell.user_id)
    }
}
