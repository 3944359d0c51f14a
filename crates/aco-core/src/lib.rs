// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Aco chat relay.
//!
//! This crate provides the error type, the shared conversation and message
//! types, and the adapter traits implemented by transports and generation
//! backends.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AcoError;
pub use types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundEvent, MessageId, OutboundMessage,
    ProviderRequest, ProviderResponse, Role, Turn,
};

pub use traits::{ChannelAdapter, PluginAdapter, ProviderAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_displays_wire_names() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Model.to_string(), "model");
        assert_eq!(Role::from_str("model").unwrap(), Role::Model);
    }

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&Turn::model("ciao")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"ciao"}"#);
    }

    #[test]
    fn reply_targets_originating_channel() {
        let event = InboundEvent {
            id: "m-1".into(),
            author_id: "alice".into(),
            is_bot_author: false,
            destination_id: Some("guild-1".into()),
            channel_id: "general".into(),
            text: "hello".into(),
        };
        let out = OutboundMessage::reply_to(&event, "hi");
        assert_eq!(out.channel_id, "general");
        assert_eq!(out.destination_id.as_deref(), Some("guild-1"));
        assert_eq!(out.reply_to.as_deref(), Some("m-1"));
        assert!(!event.is_private());
    }

    #[test]
    fn provider_errors_are_classified() {
        assert!(AcoError::provider("boom").is_provider());
        assert!(
            AcoError::Timeout {
                duration: std::time::Duration::from_secs(1)
            }
            .is_provider()
        );
        assert!(!AcoError::channel("closed").is_provider());
    }

    #[test]
    fn permission_denied_names_the_action() {
        let err = AcoError::PermissionDenied {
            action: "enable".into(),
        };
        assert_eq!(
            err.to_string(),
            "permission denied: enable requires administrator rights"
        );
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
    }
}
