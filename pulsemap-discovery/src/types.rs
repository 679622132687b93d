//! Canonical records handed to the monitoring consumer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single discovered host within a monitored cluster.
///
/// Built fresh on every poll and never retained; `up` is the provider's
/// lifecycle state, not a health probe result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterInstance {
    pub hostname: String,
    pub cluster: String,
    pub up: bool,
}

impl ClusterInstance {
    pub fn new(hostname: impl Into<String>, cluster: impl Into<String>, up: bool) -> Self {
        Self {
            hostname: hostname.into(),
            cluster: cluster.into(),
            up,
        }
    }
}

/// Sorted, de-duplicated names of clusters with at least one host up.
#[must_use]
pub fn cluster_names(records: &[ClusterInstance]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| r.up)
        .map(|r| r.cluster.clone())
        .collect()
}
