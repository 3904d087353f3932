// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret store access. The controller only ever needs the listing of one path and the
//! index the store reports for it.

pub mod client;

pub use client::VaultClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by the secret store
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vault API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Response carried no usable index: {0}")]
    MissingIndex(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result of listing a path in the secret store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretListing {
    /// Keys found under the path, or the known versions of a KV v2 secret
    pub entries: Vec<String>,
    /// Monotonically increasing index of the path
    pub index: u64,
}

/// Read-only view of the secret store used for change detection
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn list(&self, path: &str) -> Result<SecretListing, VaultError>;
}
