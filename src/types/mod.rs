// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types owned by the operator.

pub mod selector;
pub mod vault_restart;

pub use selector::LabelSelector;
pub use vault_restart::{ReconcileKey, VaultRestart, VaultRestartSpec, VaultRestartStatus};
