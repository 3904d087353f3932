// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::vault;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub vault: VaultConfig,
    /// Only watch VaultRestart resources in this namespace
    pub watch_namespace: Option<String>,
    /// Treat the first observed index of a resource as a change
    pub restart_on_first_observation: bool,
}

/// Connection settings for the Vault secret store
#[derive(Clone)]
pub struct VaultConfig {
    pub addr: Url,
    pub token: String,
    pub namespace: Option<String>,
    /// Path read on every reconciliation, e.g. `secret/metadata/app`
    pub secret_path: String,
    /// Read the index from this numeric response header of a list request instead of
    /// the KV v2 `current_version`
    pub index_header: Option<String>,
    pub timeout: Duration,
}

// Keep the token out of logs.
impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("addr", &self.addr.as_str())
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("secret_path", &self.secret_path)
            .field("index_header", &self.index_header)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr_raw = non_empty("VAULT_ADDR").unwrap_or_else(|| vault::DEFAULT_ADDR.to_string());
        let addr = Url::parse(&addr_raw)
            .with_context(|| format!("VAULT_ADDR '{}' is not a valid URL", addr_raw))?;

        let token = non_empty("VAULT_TOKEN").context("VAULT_TOKEN environment variable not set")?;

        let secret_path = non_empty("VAULT_SECRET_PATH")
            .context("VAULT_SECRET_PATH environment variable not set")?
            .trim_matches('/')
            .to_string();

        let timeout_secs = match non_empty("VAULT_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("VAULT_TIMEOUT_SECS '{}' is not a number", raw))?,
            None => vault::DEFAULT_TIMEOUT_SECS,
        };

        let restart_on_first_observation = non_empty("RESTART_ON_FIRST_OBSERVATION")
            .map(|v| v.parse::<bool>())
            .transpose()
            .context("RESTART_ON_FIRST_OBSERVATION must be 'true' or 'false'")?
            .unwrap_or(false);

        Ok(Config {
            vault: VaultConfig {
                addr,
                token,
                namespace: non_empty("VAULT_NAMESPACE"),
                secret_path,
                index_header: non_empty("VAULT_INDEX_HEADER"),
                timeout: Duration::from_secs(timeout_secs),
            },
            watch_namespace: non_empty("WATCH_NAMESPACE"),
            restart_on_first_observation,
        })
    }
}
