// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-resource reconciliation: fetch the VaultRestart, resolve its settings, check Vault
//! for a new index, restart matching pods when it moved, record the index, and schedule the
//! next check.

use super::detector::{Change, ChangeDetector};
use super::settings::{default_polling_interval, resolve};
use crate::error::{RestarterError, Result};
use crate::kubernetes::{PodRestarter, ResourceStore};
use crate::types::{ReconcileKey, VaultRestartStatus};
use crate::vault::SecretStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// What the dispatcher should do after one reconciliation
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// Resource is gone; wait for it to be recreated
    Done,
    RequeueAfter(Duration),
    Failed(RestarterError),
}

/// Drives one reconciliation cycle. Holds only shared read-only collaborators, so one
/// instance serves all keys concurrently.
pub struct Orchestrator {
    resources: Arc<dyn ResourceStore>,
    detector: ChangeDetector,
    restarter: Arc<dyn PodRestarter>,
    restart_on_first_observation: bool,
}

impl Orchestrator {
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        secrets: Arc<dyn SecretStore>,
        secret_path: impl Into<String>,
        restarter: Arc<dyn PodRestarter>,
    ) -> Self {
        Self {
            resources,
            detector: ChangeDetector::new(secrets, secret_path),
            restarter,
            restart_on_first_observation: false,
        }
    }

    /// Also restart pods the first time an index is observed for a resource
    pub fn restart_on_first_observation(mut self, enabled: bool) -> Self {
        self.restart_on_first_observation = enabled;
        self
    }

    #[instrument(skip(self, cancel), fields(key = %key))]
    pub async fn reconcile(&self, key: &ReconcileKey, cancel: &CancellationToken) -> ReconcileOutcome {
        match self.run_cycle(key, cancel).await {
            Ok(outcome) => outcome,
            Err(e) => ReconcileOutcome::Failed(e),
        }
    }

    async fn run_cycle(&self, key: &ReconcileKey, cancel: &CancellationToken) -> Result<ReconcileOutcome> {
        let fetched = until_cancelled(cancel, "fetching resource", async {
            self.resources.get(key).await.map_err(RestarterError::from)
        })
        .await?;

        let Some(resource) = fetched else {
            info!("Resource {} no longer exists, skip until next update", key);
            return Ok(ReconcileOutcome::Done);
        };

        let config = resolve(&resource.spec);

        let Some(selector) = config.selector else {
            info!("No matching labels defined on {}, skip until next update", key);
            return Ok(ReconcileOutcome::RequeueAfter(default_polling_interval()));
        };

        let change = until_cancelled(
            cancel,
            "querying secret store",
            self.detector.detect(resource.last_index()),
        )
        .await?;

        let restart_due = match change {
            Change::Unchanged { index } => {
                debug!("Index {} unchanged for {}", index, key);
                return Ok(ReconcileOutcome::RequeueAfter(config.interval));
            }
            Change::Changed { previous, current } => {
                info!(
                    "Secret at {} changed (index {} -> {}), restarting pods matching {}",
                    self.detector.path(),
                    previous,
                    current,
                    selector
                );
                true
            }
            Change::FirstObservation { current } => {
                info!("First observation of {} for {}: index {}", self.detector.path(), key, current);
                self.restart_on_first_observation
            }
        };

        if restart_due {
            until_cancelled(cancel, "restarting pods", async {
                self.restarter
                    .delete_matching(&key.namespace, &selector)
                    .await
                    .map_err(|source| RestarterError::RestartExecutionFailed {
                        selector: selector.to_string(),
                        source,
                    })
            })
            .await?;
        }

        let status = VaultRestartStatus {
            index: Some(change.current()),
        };
        until_cancelled(cancel, "persisting status", async {
            self.resources
                .update_status(key, &status)
                .await
                .map_err(|source| RestarterError::StatusPersistFailed {
                    key: key.to_string(),
                    source,
                })
        })
        .await?;

        debug!("Recorded index {} for {}, next check in {:?}", change.current(), key, config.interval);
        Ok(ReconcileOutcome::RequeueAfter(config.interval))
    }
}

/// Run `step` unless `cancel` fires first.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    step: &str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RestarterError::Cancelled(format!("aborted while {}", step))),
        res = fut => res,
    }
}
