// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod restarts through bulk deletion

use crate::types::LabelSelector;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{DeleteParams, ListParams},
    Api, Client,
};
use tracing::{info, instrument};

/// Deletes every pod matching a selector so its controller recreates it
#[async_trait]
pub trait PodRestarter: Send + Sync {
    async fn delete_matching(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<(), kube::Error>;
}

/// PodRestarter issuing a single `deletecollection` request
#[derive(Clone)]
pub struct KubePodRestarter {
    client: Client,
}

impl KubePodRestarter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PodRestarter for KubePodRestarter {
    #[instrument(skip(self), fields(selector = %selector))]
    async fn delete_matching(
        &self,
        namespace: &str,
        selector: &LabelSelector,
    ) -> Result<(), kube::Error> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let lp = ListParams::default().labels(&selector.to_string());

        let deleted = pods.delete_collection(&DeleteParams::default(), &lp).await?;

        match deleted.left() {
            Some(list) => info!(
                "Deleted {} pods in {} matching {}",
                list.items.len(),
                namespace,
                selector
            ),
            None => info!("Deletion of pods in {} matching {} accepted", namespace, selector),
        }

        Ok(())
    }
}
