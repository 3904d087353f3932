// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resolution of a VaultRestart spec into the settings used for one reconciliation.

use crate::constants::DEFAULT_POLLING_INTERVAL_SECS;
use crate::types::{LabelSelector, VaultRestartSpec};
use std::time::Duration;
use tracing::warn;

/// Longest interval accepted. tokio's timer wheel tops out at 2^36 ms (about 795 days) and
/// panics on requeues beyond it.
const MAX_POLLING_INTERVAL: Duration = Duration::from_secs(730 * 24 * 3600);

/// Settings in effect for one reconciliation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    /// `None` when the spec selects no pods
    pub selector: Option<LabelSelector>,
    pub interval: Duration,
}

pub fn default_polling_interval() -> Duration {
    Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECS)
}

/// Resolve a spec. Never fails: a bad interval degrades to the default.
pub fn resolve(spec: &VaultRestartSpec) -> EffectiveConfig {
    let interval = match spec.polling_interval.as_deref() {
        None => default_polling_interval(),
        Some(raw) => parse_polling_interval(raw).unwrap_or_else(|| {
            warn!(
                "Invalid pollingInterval '{}', using default of {}s",
                raw, DEFAULT_POLLING_INTERVAL_SECS
            );
            default_polling_interval()
        }),
    };

    EffectiveConfig {
        selector: LabelSelector::from_labels(&spec.matching_labels),
        interval,
    }
}

/// Parse `^\d+(ns|s|m|h)$`. Zero and out-of-range values are rejected.
pub fn parse_polling_interval(raw: &str) -> Option<Duration> {
    let split = raw.find(|c: char| !c.is_ascii_digit())?;
    if split == 0 {
        return None;
    }
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits.parse().ok()?;
    if value == 0 {
        return None;
    }

    let interval = match unit {
        "ns" => Duration::from_nanos(value),
        "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.checked_mul(60)?),
        "h" => Duration::from_secs(value.checked_mul(3600)?),
        _ => return None,
    };

    (interval <= MAX_POLLING_INTERVAL).then_some(interval)
}
