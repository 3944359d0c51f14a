// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Aco chat relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Persona used by every destination without an override.
pub const DEFAULT_PERSONALITY: &str =
    "Sei un assistente amichevole, utile e rispettoso. Rispondi in italiano.";

/// Reply sent when a request could not be answered.
pub const DEFAULT_ERROR_REPLY: &str = "❌ Si è verificato un errore. Riprova più tardi.";

/// Top-level configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AcoConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Routing, history and reply settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Gemini generation backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Identity used by the interactive console shell.
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "aco".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Relay behaviour configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Persona applied when a destination has no override (and in private channels).
    #[serde(default = "default_personality")]
    pub default_personality: String,

    /// Number of turns kept per user.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Platform limit for one outbound message, in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Text of the single reply sent when a request fails.
    #[serde(default = "default_error_reply")]
    pub error_reply: String,

    /// Entries returned by the leaderboard when no limit is given.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_personality: default_personality(),
            history_limit: default_history_limit(),
            max_message_length: default_max_message_length(),
            error_reply: default_error_reply(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

fn default_personality() -> String {
    DEFAULT_PERSONALITY.to_string()
}

fn default_history_limit() -> usize {
    20
}

fn default_max_message_length() -> usize {
    2000
}

fn default_error_reply() -> String {
    DEFAULT_ERROR_REPLY.to_string()
}

fn default_leaderboard_size() -> usize {
    10
}

/// Gemini API configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeout for one generation call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Console shell identity.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// User the shell speaks as.
    #[serde(default = "default_shell_user")]
    pub user_id: String,

    /// Destination the shell posts in. `None` behaves as a private channel.
    #[serde(default)]
    pub destination_id: Option<String>,

    /// Channel the shell posts in.
    #[serde(default = "default_shell_channel")]
    pub channel_id: String,

    /// Whether the shell user administers the destination.
    #[serde(default)]
    pub admin: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user_id: default_shell_user(),
            destination_id: None,
            channel_id: default_shell_channel(),
            admin: false,
        }
    }
}

fn default_shell_user() -> String {
    "local".to_string()
}

fn default_shell_channel() -> String {
    "console".to_string()
}
