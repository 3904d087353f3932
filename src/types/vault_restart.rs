// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{RestarterError, Result};
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Desired state of a VaultRestart: which pods to restart and how often to poll Vault.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "restarter.tran-scending.net",
    version = "v1",
    kind = "VaultRestart",
    singular = "vaultrestart",
    plural = "vaultrestarts",
    shortname = "vrst",
    shortname = "vrsts"
)]
#[kube(namespaced)]
#[kube(status = "VaultRestartStatus")]
#[kube(printcolumn = r#"{"name":"Interval","type":"string","jsonPath":".spec.pollingInterval"}"#)]
#[kube(printcolumn = r#"{"name":"Index","type":"integer","jsonPath":".status.index"}"#)]
#[serde(rename_all = "camelCase")]
pub struct VaultRestartSpec {
    /// Labels to match with pods to delete
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matching_labels: BTreeMap<String, String>,

    /// Reconcile interval in ns, s, m, or h units, i.e.: 60s
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(regex(pattern = r"^\d+(ns|s|m|h)$"))]
    pub polling_interval: Option<String>,
}

/// Observed state of a VaultRestart, owned by the controller.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaultRestartStatus {
    /// The Vault index saved from last run; absent until the first successful check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
}

impl VaultRestart {
    /// The index recorded by the last successful reconciliation, if any
    pub fn last_index(&self) -> Option<u64> {
        self.status.as_ref().and_then(|s| s.index)
    }
}

/// Identity of one VaultRestart resource
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReconcileKey {
    pub namespace: String,
    pub name: String,
}

impl ReconcileKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Build the key of a resource delivered by the watcher
    pub fn for_resource(resource: &VaultRestart) -> Result<Self> {
        let name = resource.name_any();
        let namespace = resource.namespace().ok_or_else(|| {
            RestarterError::InvalidResource(format!("VaultRestart {} has no namespace", name))
        })?;
        Ok(Self { namespace, name })
    }
}

impl fmt::Display for ReconcileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
