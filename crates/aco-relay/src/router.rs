// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event gate in front of the orchestrator.
//!
//! Every event passes through once: self-authored events are dropped, all
//! others are counted, group events must come from an enabled destination
//! and an active channel. Errors never escape [`MessageRouter::route`].

use std::sync::Arc;

use aco_core::InboundEvent;
use tracing::{debug, error};

use crate::orchestrator::{ConversationOrchestrator, ReplyOutcome};
use crate::settings::DestinationConfigStore;
use crate::usage::UsageTracker;

/// Terminal state of one routed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Authored by the bot itself. Not counted.
    IgnoredSelf,
    /// Counted, but the destination has the bot disabled.
    Disabled,
    /// Counted, but the channel is not active in its destination.
    InactiveChannel,
    /// Answered with this many segments.
    Replied { segments: usize },
    /// The backend failed and the error reply was sent.
    BackendFailed,
    /// Delivery failed. Logged and answered with the error reply.
    Failed,
}

impl From<ReplyOutcome> for RouteOutcome {
    fn from(outcome: ReplyOutcome) -> Self {
        match outcome {
            ReplyOutcome::Replied { segments } => Self::Replied { segments },
            ReplyOutcome::BackendFailed => Self::BackendFailed,
        }
    }
}

pub struct MessageRouter {
    settings: Arc<DestinationConfigStore>,
    usage: Arc<UsageTracker>,
    orchestrator: Arc<ConversationOrchestrator>,
}

impl MessageRouter {
    pub fn new(
        settings: Arc<DestinationConfigStore>,
        usage: Arc<UsageTracker>,
        orchestrator: Arc<ConversationOrchestrator>,
    ) -> Self {
        Self {
            settings,
            usage,
            orchestrator,
        }
    }

    pub async fn route(&self, event: &InboundEvent) -> RouteOutcome {
        if event.is_bot_author {
            return RouteOutcome::IgnoredSelf;
        }

        self.usage
            .record(&event.author_id, event.destination_id.as_deref());

        if let Some(destination_id) = event.destination_id.as_deref() {
            let settings = self.settings.get(destination_id);
            if !settings.enabled {
                debug!(destination_id, "bot disabled in destination, not replying");
                return RouteOutcome::Disabled;
            }
            if !settings.accepts(&event.channel_id) {
                debug!(
                    destination_id,
                    channel_id = event.channel_id.as_str(),
                    "channel not active, not replying"
                );
                return RouteOutcome::InactiveChannel;
            }
        }

        match self.orchestrator.respond(event).await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                error!(
                    error = %e,
                    user_id = event.author_id.as_str(),
                    channel_id = event.channel_id.as_str(),
                    "failed to handle inbound message"
                );
                self.orchestrator.send_error_reply(event).await;
                RouteOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ConversationStore;
    use aco_test_utils::{MockChannel, MockProvider};
    use tracing_test::traced_test;

    struct Fixture {
        router: MessageRouter,
        settings: Arc<DestinationConfigStore>,
        usage: Arc<UsageTracker>,
        channel: Arc<MockChannel>,
        provider: Arc<MockProvider>,
    }

    fn fixture() -> Fixture {
        let settings = Arc::new(DestinationConfigStore::new("be nice"));
        let usage = Arc::new(UsageTracker::new());
        let channel = Arc::new(MockChannel::new());
        let provider = Arc::new(MockProvider::new());
        let orchestrator = Arc::new(ConversationOrchestrator::new(
            Arc::new(ConversationStore::default()),
            settings.clone(),
            provider.clone(),
            channel.clone(),
            2000,
            "oops",
        ));
        Fixture {
            router: MessageRouter::new(settings.clone(), usage.clone(), orchestrator),
            settings,
            usage,
            channel,
            provider,
        }
    }

    fn group_event(channel_id: &str) -> InboundEvent {
        InboundEvent {
            id: "m-1".into(),
            author_id: "alice".into(),
            is_bot_author: false,
            destination_id: Some("guild".into()),
            channel_id: channel_id.into(),
            text: "hello".into(),
        }
    }

    #[tokio::test]
    async fn bot_authored_events_are_not_counted() {
        let f = fixture();
        let mut event = group_event("general");
        event.is_bot_author = true;

        assert_eq!(f.router.route(&event).await, RouteOutcome::IgnoredSelf);
        assert_eq!(f.usage.user_stats("alice").count, 0);
    }

    #[tokio::test]
    async fn unconfigured_destination_stays_silent_but_counts() {
        let f = fixture();
        assert_eq!(
            f.router.route(&group_event("general")).await,
            RouteOutcome::InactiveChannel
        );
        assert_eq!(f.usage.destination_stats("guild").total_messages, 1);
        assert!(f.provider.requests().await.is_empty());
    }

    #[tokio::test]
    async fn disabled_destination_is_gated() {
        let f = fixture();
        f.settings.add_channel("guild", "general");
        f.settings.set_enabled("guild", false);

        assert_eq!(
            f.router.route(&group_event("general")).await,
            RouteOutcome::Disabled
        );
        assert_eq!(f.channel.sent_count().await, 0);
        assert_eq!(f.usage.user_stats("alice").count, 1);
    }

    #[tokio::test]
    async fn active_channel_is_answered() {
        let f = fixture();
        f.settings.add_channel("guild", "general");
        f.provider.push_response("hi").await;

        assert_eq!(
            f.router.route(&group_event("general")).await,
            RouteOutcome::Replied { segments: 1 }
        );
    }

    #[tokio::test]
    async fn private_events_bypass_the_gate() {
        let f = fixture();
        let mut event = group_event("dm-alice");
        event.destination_id = None;
        f.provider.push_response("hi").await;

        assert_eq!(
            f.router.route(&event).await,
            RouteOutcome::Replied { segments: 1 }
        );
        assert_eq!(f.usage.user_stats("alice").count, 1);
        assert_eq!(f.usage.destination_stats("guild").total_messages, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn delivery_failure_is_logged_and_not_propagated() {
        let f = fixture();
        f.settings.add_channel("guild", "general");
        f.provider.push_response("hi").await;
        f.channel.set_fail_sends(true);

        assert_eq!(
            f.router.route(&group_event("general")).await,
            RouteOutcome::Failed
        );
        assert!(logs_contain("failed to handle inbound message"));
        assert!(logs_contain("failed to send error reply"));
    }
}
