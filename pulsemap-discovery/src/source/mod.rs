//! Discovery source contract and registry.

pub mod group;
pub mod instance;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use pulsemap_core::ConfigProvider;

use crate::cloud::{ComputeApi, ScalingGroupsApi};
use crate::error::{Error, Result};
use crate::types::ClusterInstance;

/// Configuration key for the cloud region identifier.
pub const REGION_PROPERTY: &str = "discovery.region";

/// Region assumed when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// A single origin of cluster topology.
///
/// `discover` produces the complete record set for one poll. The built-in
/// sources contain their own failures and resolve to an empty set; external
/// implementations may return an error, which the composite logs and treats
/// as an empty contribution.
#[async_trait]
pub trait InstanceDiscovery: Send + Sync {
    /// Stable identifier used in log context.
    fn name(&self) -> &str;

    /// Produce the current record set.
    async fn discover(&self) -> Result<Vec<ClusterInstance>>;
}

impl std::fmt::Debug for dyn InstanceDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceDiscovery")
            .field("name", &self.name())
            .finish()
    }
}

/// Dependencies handed to source builders.
#[derive(Clone)]
pub struct SourceContext {
    pub config: Arc<dyn ConfigProvider>,
    pub groups: Arc<dyn ScalingGroupsApi>,
    pub compute: Arc<dyn ComputeApi>,
}

impl SourceContext {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        groups: Arc<dyn ScalingGroupsApi>,
        compute: Arc<dyn ComputeApi>,
    ) -> Self {
        Self {
            config,
            groups,
            compute,
        }
    }
}

/// Builder callback registered under a source identifier.
pub type SourceBuilder =
    Box<dyn Fn(&SourceContext) -> Result<Box<dyn InstanceDiscovery>> + Send + Sync>;

/// String-keyed factory for discovery sources.
///
/// `group` and `instance` are registered out of the box; embedding
/// applications can add implementations of their own under new identifiers
/// before handing the registry to the composite.
pub struct SourceRegistry {
    builders: HashMap<String, SourceBuilder>,
}

impl SourceRegistry {
    /// Registry with the built-in sources registered.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            builders: HashMap::new(),
        };
        registry.register("group", |ctx: &SourceContext| {
            let source = group::GroupTagDiscovery::new(
                ctx.config.clone(),
                ctx.groups.clone(),
                ctx.compute.clone(),
            )?;
            Ok(Box::new(source) as Box<dyn InstanceDiscovery>)
        });
        registry.register("instance", |ctx: &SourceContext| {
            let source =
                instance::InstanceTagDiscovery::new(ctx.config.clone(), ctx.compute.clone())?;
            Ok(Box::new(source) as Box<dyn InstanceDiscovery>)
        });
        registry
    }

    /// Register (or replace) a builder under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, builder: F)
    where
        F: Fn(&SourceContext) -> Result<Box<dyn InstanceDiscovery>> + Send + Sync + 'static,
    {
        self.builders.insert(name.into(), Box::new(builder));
    }

    /// Build the source registered under `name`.
    pub fn build(&self, name: &str, ctx: &SourceContext) -> Result<Box<dyn InstanceDiscovery>> {
        match self.builders.get(name) {
            Some(builder) => builder(ctx),
            None => Err(Error::UnknownSource(name.to_string())),
        }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
