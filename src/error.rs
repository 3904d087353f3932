// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::vault::VaultError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestarterError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Secret store unavailable for path {path}: {source}")]
    SecretStoreUnavailable {
        path: String,
        #[source]
        source: VaultError,
    },

    #[error("Restart of pods matching '{selector}' failed: {source}")]
    RestartExecutionFailed {
        selector: String,
        #[source]
        source: kube::Error,
    },

    #[error("Persisting status of {key} failed: {source}")]
    StatusPersistFailed {
        key: String,
        #[source]
        source: kube::Error,
    },

    #[error("Reconciliation cancelled: {0}")]
    Cancelled(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),
}

impl RestarterError {
    /// Whether the dispatcher should retry after backoff
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Cancelled(_) | Self::InvalidResource(_))
    }
}

pub type Result<T> = std::result::Result<T, RestarterError>;
