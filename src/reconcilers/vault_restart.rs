// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! VaultRestart reconciler - watches VaultRestart resources and hands each one to the
//! orchestrator, translating its outcome into a requeue decision.

use super::backoff::ErrorBackoff;
use crate::error::{RestarterError, Result};
use crate::restart::{Orchestrator, ReconcileOutcome};
use crate::types::{ReconcileKey, VaultRestart};
use futures::StreamExt;
use kube::{
    runtime::{
        controller::{self, Action},
        Controller,
    },
    Api, Client,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub struct VaultRestartReconciler {
    client: Client,
    orchestrator: Orchestrator,
    watch_namespace: Option<String>,
    backoff: ErrorBackoff,
    shutdown: CancellationToken,
}

impl VaultRestartReconciler {
    pub fn new(
        client: Client,
        orchestrator: Orchestrator,
        watch_namespace: Option<String>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            client,
            orchestrator,
            watch_namespace,
            backoff: ErrorBackoff::default(),
            shutdown,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let restarts: Api<VaultRestart> = match &self.watch_namespace {
            Some(ns) => {
                info!("Watching VaultRestart resources in namespace {}", ns);
                Api::namespaced(self.client.clone(), ns)
            }
            None => {
                info!("Watching VaultRestart resources in all namespaces");
                Api::all(self.client.clone())
            }
        };
        let context = Arc::new(self);
        let ctx = context.clone();

        Controller::new(restarts, WatcherConfig::default())
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(move |res| {
                let ctx = ctx.clone();
                async move {
                    match res {
                        Ok(o) => debug!("Reconciled VaultRestart: {:?}", o),
                        Err(e) => {
                            forget_deleted(&ctx, &e);
                            warn!("Reconciliation error: {:?}", e);
                        }
                    }
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(restart: Arc<VaultRestart>, ctx: Arc<VaultRestartReconciler>) -> Result<Action> {
    let key = ReconcileKey::for_resource(&restart)?;
    let cancel = ctx.shutdown.child_token();

    debug!("Reconciling VaultRestart: {}", key);

    let action = match ctx.orchestrator.reconcile(&key, &cancel).await {
        ReconcileOutcome::Done => Action::await_change(),
        ReconcileOutcome::RequeueAfter(interval) => Action::requeue(interval),
        ReconcileOutcome::Failed(e) => return Err(e),
    };

    ctx.backoff.reset(&key);
    Ok(action)
}

/// A requeued object that is gone from the cache was deleted; drop its failure count.
fn forget_deleted<QErr>(ctx: &VaultRestartReconciler, error: &controller::Error<RestarterError, QErr>) {
    if let controller::Error::ObjectNotFound(obj_ref) = error {
        if let Some(namespace) = &obj_ref.namespace {
            let key = ReconcileKey::new(namespace.as_str(), obj_ref.name.as_str());
            debug!("VaultRestart {} deleted, forgetting its failures", key);
            ctx.backoff.reset(&key);
        }
    }
}

fn error_policy(
    restart: Arc<VaultRestart>,
    error: &RestarterError,
    ctx: Arc<VaultRestartReconciler>,
) -> Action {
    if !error.is_retryable() {
        warn!("Reconciliation stopped: {}", error);
        return Action::await_change();
    }

    match ReconcileKey::for_resource(&restart) {
        Ok(key) => {
            let delay = ctx.backoff.next_delay(&key);
            error!("Reconciliation of {} failed, retrying in {:?}: {}", key, delay, error);
            Action::requeue(delay)
        }
        Err(e) => {
            error!("Reconciliation error: {} ({})", error, e);
            Action::await_change()
        }
    }
}
