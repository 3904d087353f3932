// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery, resource status, and pod restarts.

pub mod crd;
pub mod pods;
pub mod store;

pub use crd::wait_for_vault_restart_crd;
pub use pods::{KubePodRestarter, PodRestarter};
pub use store::{KubeResourceStore, ResourceStore};
