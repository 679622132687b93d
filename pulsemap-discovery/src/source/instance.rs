//! Tag-based discovery: compute instances located directly by tag key.
//!
//! No group indirection; each instance names its own cluster through the
//! configured tag's value.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use pulsemap_core::ConfigProvider;

use super::{InstanceDiscovery, DEFAULT_REGION, REGION_PROPERTY};
use crate::cloud::{continuation, ComputeApi, ComputeInstance};
use crate::error::{Error, Result};
use crate::resolver::AddressResolver;
use crate::types::ClusterInstance;

/// Configuration key naming the tag that marks a compute instance as a
/// cluster member.
pub const INSTANCE_TAG_PROPERTY: &str = "discovery.instance.tag";

pub struct InstanceTagDiscovery {
    config: Arc<dyn ConfigProvider>,
    compute: Arc<dyn ComputeApi>,
    resolver: AddressResolver,
    region: String,
}

impl InstanceTagDiscovery {
    /// Fails when `discovery.instance.tag` is unset or empty.
    pub fn new(config: Arc<dyn ConfigProvider>, compute: Arc<dyn ComputeApi>) -> Result<Self> {
        let tag_key = config.get_or(INSTANCE_TAG_PROPERTY, "");
        if tag_key.is_empty() {
            return Err(Error::Configuration(format!(
                "{INSTANCE_TAG_PROPERTY} must be supplied"
            )));
        }

        let region = config.get_or(REGION_PROPERTY, DEFAULT_REGION);
        debug!(%region, tag = %tag_key, "instance discovery configured");

        let resolver = AddressResolver::new(config.clone());
        Ok(Self {
            config,
            compute,
            resolver,
            region,
        })
    }

    fn tag_key(&self) -> Result<String> {
        let tag_key = self.config.get_or(INSTANCE_TAG_PROPERTY, "");
        if tag_key.is_empty() {
            return Err(Error::Configuration(format!(
                "{INSTANCE_TAG_PROPERTY} is no longer set"
            )));
        }
        Ok(tag_key)
    }

    async fn poll(&self) -> Result<Vec<ClusterInstance>> {
        let tag_key = self.tag_key()?;

        let mut records = Vec::new();
        let mut token = None;

        loop {
            let page = self.compute.list_instances_by_tag(&tag_key, token).await?;
            for instance in &page.instances {
                let Some(cluster) = cluster_tag(instance, &tag_key) else {
                    continue;
                };
                records.push(self.resolver.resolve(cluster, instance));
            }

            token = continuation(page.next_token);
            if token.is_none() {
                break;
            }
        }

        Ok(records)
    }
}

/// Value of the instance's first tag matching `tag_key` in provider order,
/// skipping empty values. `None` excludes the instance from the result.
fn cluster_tag<'a>(instance: &'a ComputeInstance, tag_key: &str) -> Option<&'a str> {
    instance
        .tags
        .iter()
        .find(|t| t.key == tag_key && !t.value.is_empty())
        .map(|t| t.value.as_str())
}

#[async_trait]
impl InstanceDiscovery for InstanceTagDiscovery {
    fn name(&self) -> &str {
        "instance"
    }

    /// Never fails: any error inside the poll is logged and the source
    /// contributes nothing this cycle.
    async fn discover(&self) -> Result<Vec<ClusterInstance>> {
        match self.poll().await {
            Ok(records) => {
                debug!(count = records.len(), "instance discovery poll complete");
                Ok(records)
            }
            Err(e) => {
                let tag_key = self.config.get_or(INSTANCE_TAG_PROPERTY, "");
                error!(
                    tag = %tag_key,
                    region = %self.region,
                    error = %e,
                    "failed to discover tagged compute instances"
                );
                Ok(Vec::new())
            }
        }
    }
}
