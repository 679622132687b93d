//! Composition of discovery sources with per-source fault isolation.
//!
//! One unreachable cloud API or misbehaving source degrades the snapshot by
//! only the clusters that source alone provides; the others still
//! contribute.

use async_trait::async_trait;
use tracing::error;

use crate::error::{Error, Result};
use crate::source::{InstanceDiscovery, SourceContext, SourceRegistry};
use crate::types::ClusterInstance;

/// Configuration key for the comma-separated list of source identifiers.
pub const SOURCES_PROPERTY: &str = "discovery.sources";

/// Source list assumed when none is configured.
pub const DEFAULT_SOURCES: &str = "group";

#[derive(Debug)]
pub struct CompositeDiscovery {
    sources: Vec<Box<dyn InstanceDiscovery>>,
}

impl CompositeDiscovery {
    /// Compose an explicit list of sources. Fails on an empty list; a
    /// composite with nothing to poll is a misconfiguration.
    pub fn new(sources: Vec<Box<dyn InstanceDiscovery>>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::Configuration(
                "no discovery sources could be constructed".to_string(),
            ));
        }
        Ok(Self { sources })
    }

    /// Build from the `discovery.sources` list. Identifiers that fail to
    /// resolve or construct are logged and skipped; at least one source
    /// must come up.
    pub fn from_config(registry: &SourceRegistry, ctx: &SourceContext) -> Result<Self> {
        let configured = ctx.config.get_or(SOURCES_PROPERTY, DEFAULT_SOURCES);

        let mut sources = Vec::new();
        for name in configured.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match registry.build(name, ctx) {
                Ok(source) => sources.push(source),
                Err(e) => {
                    error!(source = name, error = %e, "could not construct discovery source");
                }
            }
        }

        Self::new(sources)
    }

    /// Identifiers of the composed sources, in poll order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl InstanceDiscovery for CompositeDiscovery {
    fn name(&self) -> &str {
        "composite"
    }

    /// Polls every source in order and concatenates their records. A
    /// failing source is logged and contributes nothing; it never aborts
    /// the others.
    async fn discover(&self) -> Result<Vec<ClusterInstance>> {
        let mut records = Vec::new();
        for source in &self.sources {
            match source.discover().await {
                Ok(found) => records.extend(found),
                Err(e) => {
                    error!(source = source.name(), error = %e, "discovery source failed, skipping");
                }
            }
        }
        Ok(records)
    }
}
