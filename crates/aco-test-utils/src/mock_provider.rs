// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies and
//! failures, and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use aco_core::traits::adapter::PluginAdapter;
use aco_core::traits::provider::ProviderAdapter;
use aco_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse};
use aco_core::AcoError;

/// A mock backend that answers from a FIFO script.
///
/// Each entry is either a reply or a failure message. When the script is
/// empty, a default "mock response" text is returned.
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    delay: Option<Duration>,
    health: Arc<Mutex<HealthStatus>>,
    shutdowns: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            health: Arc::new(Mutex::new(HealthStatus::Healthy)),
            shutdowns: AtomicUsize::new(0),
        }
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            ..Self::new()
        }
    }

    /// Suspend every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append a reply to the script.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.script.lock().await.push_back(Ok(text.into()));
    }

    /// Append a failure to the script.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.script.lock().await.push_back(Err(message.into()));
    }

    /// All requests received so far, in call order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Status reported by every subsequent `health_check()`.
    pub async fn set_health(&self, status: HealthStatus) {
        *self.health.lock().await = status;
    }

    /// Number of `shutdown()` calls.
    pub fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    async fn next_entry(&self) -> Result<String, String> {
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AcoError> {
        Ok(self.health.lock().await.clone())
    }

    async fn shutdown(&self) -> Result<(), AcoError> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AcoError> {
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.next_entry().await {
            Ok(text) => Ok(ProviderResponse {
                text,
                model: Some("mock-model".to_string()),
            }),
            Err(message) => Err(AcoError::provider(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> ProviderRequest {
        ProviderRequest {
            system_prompt: "persona".into(),
            history: Vec::new(),
            prompt: prompt.into(),
        }
    }

    #[tokio::test]
    async fn script_is_consumed_in_order() {
        let provider = MockProvider::with_responses(vec!["one".into(), "two".into()]);
        provider.push_error("boom").await;

        assert_eq!(provider.complete(request("a")).await.unwrap().text, "one");
        assert_eq!(provider.complete(request("b")).await.unwrap().text, "two");
        assert!(provider.complete(request("c")).await.unwrap_err().is_provider());
        assert_eq!(
            provider.complete(request("d")).await.unwrap().text,
            "mock response"
        );
    }

    #[tokio::test]
    async fn requests_are_recorded() {
        let provider = MockProvider::new();
        provider.complete(request("hello")).await.unwrap();

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "hello");
    }
}
