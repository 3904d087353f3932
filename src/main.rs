// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vault_restarter::config::Config;
use vault_restarter::kubernetes::{wait_for_vault_restart_crd, KubePodRestarter, KubeResourceStore};
use vault_restarter::reconcilers::VaultRestartReconciler;
use vault_restarter::restart::Orchestrator;
use vault_restarter::vault::VaultClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Vault restarter");

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: vault_addr={}, secret_path={}, watch_namespace={}",
        config.vault.addr,
        config.vault.secret_path,
        config.watch_namespace.as_deref().unwrap_or("<all>")
    );

    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // Wait for the VaultRestart CRD before starting the reconciler
    info!("Waiting for VaultRestart CRD to become available...");
    wait_for_vault_restart_crd(&client).await?;

    let vault = VaultClient::new(&config.vault)?;
    let orchestrator = Orchestrator::new(
        Arc::new(KubeResourceStore::new(client.clone())),
        Arc::new(vault),
        config.vault.secret_path.clone(),
        Arc::new(KubePodRestarter::new(client.clone())),
    )
    .restart_on_first_observation(config.restart_on_first_observation);

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    let reconciler =
        VaultRestartReconciler::new(client, orchestrator, config.watch_namespace, shutdown);

    info!("Starting reconciler...");
    reconciler.run().await?;

    warn!("Reconciler stopped");
    Ok(())
}

/// Cancel in-flight reconciliations on SIGINT or SIGTERM
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut terminate =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    let _ = ctrl_c.await;
                    shutdown.cancel();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }

    info!("Shutdown signal received, cancelling in-flight reconciliations");
    shutdown.cancel();
}
