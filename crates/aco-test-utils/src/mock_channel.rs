// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound messages for assertion in tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use aco_core::traits::adapter::PluginAdapter;
use aco_core::traits::channel::ChannelAdapter;
use aco_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundEvent, MessageId, OutboundMessage,
};
use aco_core::AcoError;

/// A mock chat transport for testing.
///
/// Provides two queues:
/// - **inbound**: events injected via `inject_event()` are returned by `receive()`
/// - **sent**: messages passed to `send()` are captured and retrievable via `sent_messages()`
///
/// Administrators are registered per destination with `add_admin()`.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    admins: Arc<Mutex<HashSet<(String, String)>>>,
    notify: Arc<Notify>,
    capabilities: ChannelCapabilities,
    typing: AtomicUsize,
    shutdowns: AtomicUsize,
    fail_sends: AtomicBool,
    closed: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues, no typing support and no
    /// message size limit.
    pub fn new() -> Self {
        Self::with_capabilities(ChannelCapabilities {
            supports_typing: false,
            max_message_length: None,
        })
    }

    pub fn with_capabilities(capabilities: ChannelCapabilities) -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            admins: Arc::new(Mutex::new(HashSet::new())),
            notify: Arc::new(Notify::new()),
            capabilities,
            typing: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
            fail_sends: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Make `receive()` fail once the queue is drained, as a closed transport would.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Grant `user_id` administrator rights in `destination_id`.
    pub async fn add_admin(&self, destination_id: &str, user_id: &str) {
        self.admins
            .lock()
            .await
            .insert((destination_id.to_string(), user_id.to_string()));
    }

    /// Make every subsequent `send()` fail.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the text of every sent message, in send order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|m| m.content.clone())
            .collect()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// Number of typing indicators requested.
    pub fn typing_count(&self) -> usize {
        self.typing.load(Ordering::SeqCst)
    }

    /// Number of `shutdown()` calls.
    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
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
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        self.capabilities.clone()
    }

    async fn connect(&mut self) -> Result<(), AcoError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, AcoError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(AcoError::channel("mock send failure"));
        }
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }

    async fn receive(&self) -> Result<InboundEvent, AcoError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(AcoError::channel("mock channel closed"));
            }
            // Wait for an injected event or close().
            self.notify.notified().await;
        }
    }

    async fn send_typing(&self, _channel_id: &str) -> Result<(), AcoError> {
        self.typing.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn is_admin(&self, destination_id: &str, user_id: &str) -> Result<bool, AcoError> {
        Ok(self
            .admins
            .lock()
            .await
            .contains(&(destination_id.to_string(), user_id.to_string())))
    }
}
