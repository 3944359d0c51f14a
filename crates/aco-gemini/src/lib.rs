// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini generation backend for the Aco chat relay.
//!
//! Implements [`ProviderAdapter`] over the `generateContent` endpoint. The
//! persona is sent as the system instruction, prior turns as `contents`,
//! and the new message as the final user content.

pub mod client;
pub mod types;

use std::time::Duration;

use aco_config::model::GeminiConfig;
use aco_core::error::AcoError;
use aco_core::traits::{PluginAdapter, ProviderAdapter};
use aco_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, Role,
};
use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest, GenerateContentResponse};

/// Environment variable consulted when `gemini.api_key` is unset.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini backend implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig) -> Result<Self, AcoError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = GeminiClient::new(
            &api_key,
            config.model.as_str(),
            config.base_url.as_str(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = config.model.as_str(), "Gemini provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

/// Builds the wire request.
///
/// The API expects the conversation to open with a user turn, so leading
/// model turns left over from a trimmed window are dropped.
fn to_generate_request(request: &ProviderRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .skip_while(|turn| turn.role == Role::Model)
        .map(|turn| Content::text(Some(turn.role.to_string().as_str()), turn.text.as_str()))
        .collect();
    contents.push(Content::text(
        Some(Role::User.to_string().as_str()),
        request.prompt.as_str(),
    ));

    let system_instruction = (!request.system_prompt.is_empty())
        .then(|| Content::text(None, request.system_prompt.as_str()));

    GenerateContentRequest {
        system_instruction,
        contents,
    }
}

/// Joins the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, AcoError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(AcoError::provider(format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AcoError::provider("response contained no candidates"))?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(AcoError::provider(format!(
            "candidate contained no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AcoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AcoError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AcoError> {
        let api_request = to_generate_request(&request);
        let response = self.client.generate_content(&api_request).await?;
        let model = response
            .model_version
            .clone()
            .or_else(|| Some(self.client.model().to_string()));

        Ok(ProviderResponse {
            text: extract_text(response)?,
            model,
        })
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: Option<&str>) -> Result<SecretString, AcoError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(SecretString::from(key.to_string()));
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            AcoError::Config(format!(
                "Gemini API key not found. Set gemini.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aco_core::Turn;
    use secrecy::ExposeSecret;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GeminiProvider {
        let config = GeminiConfig {
            api_key: Some("test-api-key".into()),
            base_url: server.uri(),
            ..GeminiConfig::default()
        };
        GeminiProvider::new(&config).unwrap()
    }

    fn request(history: Vec<Turn>, prompt: &str) -> ProviderRequest {
        ProviderRequest {
            system_prompt: "Rispondi in italiano.".into(),
            history,
            prompt: prompt.into(),
        }
    }

    #[test]
    fn resolve_api_key_from_config() {
        let key = resolve_api_key(Some("k-123")).unwrap();
        assert_eq!(key.expose_secret(), "k-123");
    }

    #[test]
    fn resolve_api_key_falls_back_to_env() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let err = resolve_api_key(None).unwrap_err();
            assert!(matches!(err, AcoError::Config(_)));
            assert!(err.to_string().contains(API_KEY_ENV), "got: {err}");

            jail.set_env(API_KEY_ENV, "");
            assert!(resolve_api_key(None).is_err());

            jail.set_env(API_KEY_ENV, "env-key");
            assert_eq!(resolve_api_key(None).unwrap().expose_secret(), "env-key");
            // An empty configured key does not shadow the environment.
            assert_eq!(resolve_api_key(Some("")).unwrap().expose_secret(), "env-key");
            assert_eq!(
                resolve_api_key(Some("config-key")).unwrap().expose_secret(),
                "config-key"
            );
            Ok(())
        });
    }

    #[test]
    fn provider_without_key_explains_how_to_set_it() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let err = GeminiProvider::new(&GeminiConfig::default())
                .err()
                .expect("construction must fail without a key");
            let message = err.to_string();
            assert!(message.contains("gemini.api_key"), "got: {message}");
            assert!(message.contains(API_KEY_ENV), "got: {message}");
            Ok(())
        });
    }

    #[test]
    fn request_maps_history_roles_and_prompt() {
        let api = to_generate_request(&request(
            vec![Turn::user("ciao"), Turn::model("ciao!")],
            "come stai?",
        ));

        let roles: Vec<_> = api
            .contents
            .iter()
            .map(|c| c.role.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(
            api.contents[2].parts[0].text.as_deref(),
            Some("come stai?")
        );
        assert_eq!(
            api.system_instruction.unwrap().parts[0].text.as_deref(),
            Some("Rispondi in italiano.")
        );
    }

    #[test]
    fn leading_model_turns_are_dropped() {
        let api = to_generate_request(&request(
            vec![Turn::model("orphan"), Turn::user("a"), Turn::model("b")],
            "c",
        ));
        assert_eq!(api.contents.len(), 3);
        assert_eq!(api.contents[0].role.as_deref(), Some("user"));
    }

    #[tokio::test]
    async fn complete_joins_first_candidate_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "Rispondi in italiano."}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "Ciao, "}, {"text": "come va?"}]}},
                    {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
                ]
            })))
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .complete(request(Vec::new(), "ciao"))
            .await
            .unwrap();
        assert_eq!(response.text, "Ciao, come va?");
        assert_eq!(response.model.as_deref(), Some("gemini-pro"));
    }

    #[tokio::test]
    async fn blocked_prompt_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request(Vec::new(), "something"))
            .await
            .unwrap_err();
        assert!(err.is_provider());
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn empty_candidates_are_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request(Vec::new(), "something"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[test]
    fn plugin_adapter_metadata() {
        let client = GeminiClient::new(
            &SecretString::from("k".to_string()),
            "gemini-pro",
            "http://localhost",
            Duration::from_secs(1),
        )
        .unwrap();
        let provider = GeminiProvider::with_client(client);
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.adapter_type(), AdapterType::Provider);
    }
}
