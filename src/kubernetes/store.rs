// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Access to VaultRestart resources and their status subresource

use crate::constants::OPERATOR_NAME;
use crate::types::{ReconcileKey, VaultRestart, VaultRestartStatus};
use async_trait::async_trait;
use kube::{
    api::{Patch, PatchParams},
    Api, Client,
};
use tracing::{debug, instrument};

/// Fetch and status-update operations for VaultRestart resources
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Returns `None` when the resource no longer exists
    async fn get(&self, key: &ReconcileKey) -> Result<Option<VaultRestart>, kube::Error>;

    async fn update_status(
        &self,
        key: &ReconcileKey,
        status: &VaultRestartStatus,
    ) -> Result<(), kube::Error>;
}

/// ResourceStore backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeResourceStore {
    client: Client,
}

impl KubeResourceStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, key: &ReconcileKey) -> Api<VaultRestart> {
        Api::namespaced(self.client.clone(), &key.namespace)
    }
}

#[async_trait]
impl ResourceStore for KubeResourceStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &ReconcileKey) -> Result<Option<VaultRestart>, kube::Error> {
        self.api(key).get_opt(&key.name).await
    }

    #[instrument(skip(self, status), fields(key = %key))]
    async fn update_status(
        &self,
        key: &ReconcileKey,
        status: &VaultRestartStatus,
    ) -> Result<(), kube::Error> {
        let patch = serde_json::json!({ "status": status });
        let pp = PatchParams::apply(OPERATOR_NAME);

        self.api(key)
            .patch_status(&key.name, &pp, &Patch::Merge(&patch))
            .await?;

        debug!("Status of {} set to {:?}", key, status);
        Ok(())
    }
}
