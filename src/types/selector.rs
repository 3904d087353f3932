// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::collections::BTreeMap;
use std::fmt;

/// Non-empty set of equality constraints on pod labels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSelector(BTreeMap<String, String>);

impl LabelSelector {
    /// Returns `None` for an empty label map, which selects nothing.
    pub fn from_labels(labels: &BTreeMap<String, String>) -> Option<Self> {
        if labels.is_empty() {
            None
        } else {
            Some(Self(labels.clone()))
        }
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Renders in the `labelSelector` query format, `k1=v1,k2=v2`, keys sorted.
impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&rendered)
    }
}
