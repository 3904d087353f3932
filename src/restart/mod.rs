// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Restart decision logic: settings resolution, change detection, and the reconcile cycle.

pub mod detector;
pub mod orchestrator;
pub mod settings;

pub use detector::{Change, ChangeDetector};
pub use orchestrator::{Orchestrator, ReconcileOutcome};
pub use settings::{default_polling_interval, parse_polling_interval, resolve, EffectiveConfig};
