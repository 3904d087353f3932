// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name used as field manager for status patches
pub const OPERATOR_NAME: &str = "vault-restarter";

/// VaultRestart custom resource coordinates
pub mod crd {
    pub const GROUP: &str = "restarter.tran-scending.net";
    pub const VERSION: &str = "v1";
    pub const KIND: &str = "VaultRestart";

    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Polling used when `pollingInterval` is absent or invalid
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 60;

/// Requeue backoff applied by the error policy
pub mod backoff {
    pub const INITIAL_SECS: u64 = 5;
    pub const MAX_SECS: u64 = 300;
}

/// Vault HTTP API details
pub mod vault {
    pub const DEFAULT_ADDR: &str = "https://127.0.0.1:8200";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const TOKEN_HEADER: &str = "X-Vault-Token";
    pub const NAMESPACE_HEADER: &str = "X-Vault-Namespace";
}
