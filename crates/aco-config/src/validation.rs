// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express. Every
//! violation is collected; validation does not stop at the first one.

use crate::diagnostic::ConfigError;
use crate::model::AcoConfig;

/// Smallest history that still holds one user/model exchange.
const MIN_HISTORY_LIMIT: usize = 2;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &AcoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.relay.default_personality.trim().is_empty() {
        fail("relay.default_personality must not be empty".to_string());
    }

    if config.relay.error_reply.trim().is_empty() {
        fail("relay.error_reply must not be empty".to_string());
    }

    if config.relay.history_limit < MIN_HISTORY_LIMIT {
        fail(format!(
            "relay.history_limit must be at least {MIN_HISTORY_LIMIT}, got {}",
            config.relay.history_limit
        ));
    }

    if config.relay.max_message_length == 0 {
        fail("relay.max_message_length must be at least 1".to_string());
    }

    if config.relay.leaderboard_size == 0 {
        fail("relay.leaderboard_size must be at least 1".to_string());
    }

    if config.gemini.model.trim().is_empty() {
        fail("gemini.model must not be empty".to_string());
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be at least 1".to_string());
    }

    if !config.gemini.base_url.starts_with("http://")
        && !config.gemini.base_url.starts_with("https://")
    {
        fail(format!(
            "gemini.base_url `{}` must start with http:// or https://",
            config.gemini.base_url
        ));
    }

    if config.shell.user_id.trim().is_empty() {
        fail("shell.user_id must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&AcoConfig::default()).is_ok());
    }

    #[test]
    fn tiny_history_limit_fails_validation() {
        let mut config = AcoConfig::default();
        config.relay.history_limit = 1;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "history_limit"));
    }

    #[test]
    fn zero_message_length_fails_validation() {
        let mut config = AcoConfig::default();
        config.relay.max_message_length = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "max_message_length"));
    }

    #[test]
    fn blank_personality_fails_validation() {
        let mut config = AcoConfig::default();
        config.relay.default_personality = "   ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "default_personality"));
    }

    #[test]
    fn collects_every_violation() {
        let mut config = AcoConfig::default();
        config.relay.error_reply = String::new();
        config.gemini.timeout_secs = 0;
        config.gemini.base_url = "ftp://example".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "error_reply"));
        assert!(has_error(&errors, "timeout_secs"));
        assert!(has_error(&errors, "base_url"));
    }
}
