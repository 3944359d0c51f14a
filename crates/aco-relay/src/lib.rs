// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message routing and conversation state for the Aco chat relay.
//!
//! [`Relay`] ties the pieces together: a [`MessageRouter`] gates every
//! inbound event, a [`ConversationOrchestrator`] runs the backend call and
//! sends the reply segments, and three process-wide stores hold destination
//! settings, per-user history and usage counters. None of the state survives
//! a restart.

pub mod chunker;
pub mod commands;
pub mod history;
pub mod orchestrator;
pub mod router;
pub mod settings;
pub mod usage;

use std::sync::Arc;
use std::time::Duration;

use aco_config::model::RelayConfig;
use aco_core::{AcoError, ChannelAdapter, HealthStatus, InboundEvent, ProviderAdapter};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

pub use commands::{Command, CommandReply, Invocation, MAX_PERSONALITY_CHARS};
pub use history::{ConversationStore, DEFAULT_HISTORY_LIMIT};
pub use orchestrator::{ConversationOrchestrator, ReplyOutcome};
pub use router::{MessageRouter, RouteOutcome};
pub use settings::{
    AddChannelOutcome, DestinationConfigStore, DestinationSettings, DestinationStatus,
    RemoveChannelOutcome,
};
pub use usage::{DestinationStats, UsageTracker, UserCount, UserStats};

/// How long [`Relay::run`] waits for in-flight events after cancellation.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// The relay core, shared by the event loop and the command shell.
pub struct Relay {
    settings: Arc<DestinationConfigStore>,
    history: Arc<ConversationStore>,
    usage: Arc<UsageTracker>,
    router: MessageRouter,
    channel: Arc<dyn ChannelAdapter>,
    provider: Arc<dyn ProviderAdapter>,
    leaderboard_size: usize,
}

impl Relay {
    pub fn new(
        config: &RelayConfig,
        channel: Arc<dyn ChannelAdapter>,
        provider: Arc<dyn ProviderAdapter>,
    ) -> Self {
        let settings = Arc::new(DestinationConfigStore::new(
            config.default_personality.as_str(),
        ));
        let history = Arc::new(ConversationStore::new(config.history_limit));
        let usage = Arc::new(UsageTracker::new());
        let orchestrator = Arc::new(ConversationOrchestrator::new(
            history.clone(),
            settings.clone(),
            provider.clone(),
            channel.clone(),
            config.max_message_length,
            config.error_reply.as_str(),
        ));
        let router = MessageRouter::new(settings.clone(), usage.clone(), orchestrator);

        Self {
            settings,
            history,
            usage,
            router,
            channel,
            provider,
            leaderboard_size: config.leaderboard_size,
        }
    }

    pub fn channel(&self) -> &Arc<dyn ChannelAdapter> {
        &self.channel
    }

    pub fn leaderboard_size(&self) -> usize {
        self.leaderboard_size
    }

    /// Routes one inbound event. Never fails; see [`RouteOutcome`].
    pub async fn handle_inbound(&self, event: &InboundEvent) -> RouteOutcome {
        self.router.route(event).await
    }

    pub fn status(&self, destination_id: &str) -> DestinationStatus {
        self.settings.status(destination_id)
    }

    pub fn set_enabled(&self, destination_id: &str, enabled: bool) {
        self.settings.set_enabled(destination_id, enabled);
    }

    pub fn add_channel(&self, destination_id: &str, channel_id: &str) -> AddChannelOutcome {
        self.settings.add_channel(destination_id, channel_id)
    }

    pub fn remove_channel(&self, destination_id: &str, channel_id: &str) -> RemoveChannelOutcome {
        self.settings.remove_channel(destination_id, channel_id)
    }

    pub fn list_channels(&self, destination_id: &str) -> Vec<String> {
        self.settings.list_channels(destination_id)
    }

    pub fn clear_history(&self, user_id: &str) {
        self.history.clear(user_id);
    }

    /// Stored turns for `user_id`, oldest first.
    pub fn history(&self, user_id: &str) -> Vec<aco_core::Turn> {
        self.history.history(user_id)
    }

    pub fn user_usage(&self, user_id: &str) -> UserStats {
        self.usage.user_stats(user_id)
    }

    pub fn destination_usage(&self, destination_id: &str) -> DestinationStats {
        self.usage.destination_stats(destination_id)
    }

    pub fn top_users(&self, destination_id: &str, limit: usize) -> Vec<UserCount> {
        self.usage.top_users(destination_id, limit)
    }

    pub fn set_personality(&self, destination_id: &str, text: impl Into<String>) {
        self.settings.set_personality(destination_id, text);
    }

    pub fn personality(&self, destination_id: &str) -> String {
        self.settings.personality(destination_id)
    }

    pub fn has_custom_personality(&self, destination_id: &str) -> bool {
        self.settings.get(destination_id).personality.is_some()
    }

    pub fn reset_personality(&self, destination_id: &str) {
        self.settings.reset_personality(destination_id);
    }

    /// Combined health of the transport and the backend. A failed check
    /// counts as unhealthy; any unhealthy adapter makes the relay unhealthy.
    pub async fn health(&self) -> HealthStatus {
        let mut any_unhealthy = false;
        let mut reasons = Vec::new();

        let checks = [
            (self.channel.name(), self.channel.health_check().await),
            (self.provider.name(), self.provider.health_check().await),
        ];
        for (name, check) in checks {
            match check {
                Ok(HealthStatus::Healthy) => {}
                Ok(HealthStatus::Degraded(reason)) => reasons.push(format!("{name}: {reason}")),
                Ok(HealthStatus::Unhealthy(reason)) => {
                    any_unhealthy = true;
                    reasons.push(format!("{name}: {reason}"));
                }
                Err(e) => {
                    any_unhealthy = true;
                    reasons.push(format!("{name}: {e}"));
                }
            }
        }

        if any_unhealthy {
            HealthStatus::Unhealthy(reasons.join("; "))
        } else if !reasons.is_empty() {
            HealthStatus::Degraded(reasons.join("; "))
        } else {
            HealthStatus::Healthy
        }
    }

    /// Shuts the transport and the backend down. Failures are logged and
    /// do not stop the other adapter from shutting down.
    pub async fn shutdown(&self) {
        if let Err(e) = self.channel.shutdown().await {
            warn!(channel = self.channel.name(), error = %e, "channel shutdown error");
        }
        if let Err(e) = self.provider.shutdown().await {
            warn!(provider = self.provider.name(), error = %e, "provider shutdown error");
        }
    }

    /// Receives events until `cancel` fires or the transport fails, handling
    /// each event in its own task. In-flight events are drained for at most
    /// [`DRAIN_TIMEOUT`], then both adapters are shut down.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) -> Result<(), AcoError> {
        info!(channel = self.channel.name(), "relay running");
        let tracker = TaskTracker::new();

        let result = loop {
            tokio::select! {
                event = self.channel.receive() => match event {
                    Ok(event) => {
                        let relay = Arc::clone(&self);
                        tracker.spawn(async move {
                            relay.handle_inbound(&event).await;
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "channel receive error, stopping relay");
                        break Err(e);
                    }
                },
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping relay");
                    break Ok(());
                }
            }
        };

        tracker.close();
        if !tracker.is_empty() {
            info!(count = tracker.len(), "waiting for in-flight events");
        }
        if tokio::time::timeout(DRAIN_TIMEOUT, tracker.wait())
            .await
            .is_err()
        {
            warn!(
                remaining = tracker.len(),
                "drain timeout elapsed, abandoning in-flight events"
            );
        }

        self.shutdown().await;
        info!("relay stopped");
        result
    }
}
