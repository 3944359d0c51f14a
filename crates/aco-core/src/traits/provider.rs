// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for generative-text backends.

use async_trait::async_trait;

use crate::error::AcoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a generative-text backend.
///
/// The backend is opaque: one request in, one reply (or a failure) out.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Generates a reply for the given persona, prior turns and prompt.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AcoError>;
}
