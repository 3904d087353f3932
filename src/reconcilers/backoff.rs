// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-key exponential backoff for failed reconciliations

use crate::constants::backoff::{INITIAL_SECS, MAX_SECS};
use crate::types::ReconcileKey;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Tracks consecutive failures per key. Delays double from `initial` up to `max`.
#[derive(Debug)]
pub struct ErrorBackoff {
    failures: Mutex<HashMap<ReconcileKey, u32>>,
    initial: Duration,
    max: Duration,
}

impl Default for ErrorBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(INITIAL_SECS), Duration::from_secs(MAX_SECS))
    }
}

impl ErrorBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            failures: Mutex::new(HashMap::new()),
            initial,
            max,
        }
    }

    /// Record a failure of `key` and return how long to wait before retrying it
    pub fn next_delay(&self, key: &ReconcileKey) -> Duration {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let attempt = failures.entry(key.clone()).or_insert(0);

        let factor = 1u32.checked_shl(*attempt).unwrap_or(u32::MAX);
        let delay = self.initial.saturating_mul(factor).min(self.max);

        *attempt = attempt.saturating_add(1);
        delay
    }

    /// Forget failures of `key` after a successful reconciliation
    pub fn reset(&self, key: &ReconcileKey) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
