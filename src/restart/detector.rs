// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Detects secret changes by comparing the store's index with the last recorded one.

use crate::error::{RestarterError, Result};
use crate::vault::SecretStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Outcome of comparing the current index with the recorded one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Unchanged { index: u64 },
    Changed { previous: u64, current: u64 },
    /// Nothing was recorded yet
    FirstObservation { current: u64 },
}

impl Change {
    pub fn compare(last_index: Option<u64>, current: u64) -> Self {
        match last_index {
            None => Change::FirstObservation { current },
            Some(previous) if previous == current => Change::Unchanged { index: current },
            Some(previous) => Change::Changed { previous, current },
        }
    }

    /// Index to record once this change has been handled
    pub fn current(&self) -> u64 {
        match *self {
            Change::Unchanged { index } => index,
            Change::Changed { current, .. } | Change::FirstObservation { current } => current,
        }
    }
}

/// Queries one secret store path for its index
#[derive(Clone)]
pub struct ChangeDetector {
    store: Arc<dyn SecretStore>,
    path: String,
}

impl ChangeDetector {
    pub fn new(store: Arc<dyn SecretStore>, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn detect(&self, last_index: Option<u64>) -> Result<Change> {
        let listing = self.store.list(&self.path).await.map_err(|source| {
            RestarterError::SecretStoreUnavailable {
                path: self.path.clone(),
                source,
            }
        })?;

        let change = Change::compare(last_index, listing.index);
        debug!(
            "Path {} lists {} entries, index {} (last recorded {:?})",
            self.path,
            listing.entries.len(),
            listing.index,
            last_index
        );
        Ok(change)
    }
}
