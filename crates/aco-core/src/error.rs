// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Aco chat relay.

use thiserror::Error;

/// The primary error type used across adapter traits and relay operations.
#[derive(Debug, Error)]
pub enum AcoError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport errors (send failure, closed event stream, unknown channel).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generation backend errors (HTTP failure, blocked prompt, malformed reply).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The invoking actor is not an administrator of the destination.
    #[error("permission denied: {action} requires administrator rights")]
    PermissionDenied { action: String },

    /// A command was invoked with arguments or in a scope it does not support.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AcoError {
    /// Shorthand for a [`AcoError::Provider`] without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`AcoError::Channel`] without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true when the error originated in the generation backend.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Timeout { .. })
    }
}
