//! Group-based discovery: scaling groups located by tag key.
//!
//! The configured tag marks a scaling group as a monitored cluster and its
//! value names the cluster. Group membership is resolved to instance
//! details with one batched lookup per group, then mapped to canonical
//! records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use pulsemap_core::ConfigProvider;

use super::{InstanceDiscovery, DEFAULT_REGION, REGION_PROPERTY};
use crate::cloud::{continuation, ComputeApi, ScalingGroup, ScalingGroupsApi};
use crate::error::{Error, Result};
use crate::resolver::AddressResolver;
use crate::types::ClusterInstance;

/// Configuration key naming the tag that marks a scaling group as a
/// monitored cluster.
pub const GROUP_TAG_PROPERTY: &str = "discovery.group.tag";

pub struct GroupTagDiscovery {
    config: Arc<dyn ConfigProvider>,
    groups: Arc<dyn ScalingGroupsApi>,
    compute: Arc<dyn ComputeApi>,
    resolver: AddressResolver,
    region: String,
}

impl GroupTagDiscovery {
    /// Fails when `discovery.group.tag` is unset or empty; a missing tag
    /// key is a startup misconfiguration, not a poll-time condition.
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        groups: Arc<dyn ScalingGroupsApi>,
        compute: Arc<dyn ComputeApi>,
    ) -> Result<Self> {
        let tag_key = config.get_or(GROUP_TAG_PROPERTY, "");
        if tag_key.is_empty() {
            return Err(Error::Configuration(format!(
                "{GROUP_TAG_PROPERTY} must be supplied"
            )));
        }

        let region = config.get_or(REGION_PROPERTY, DEFAULT_REGION);
        debug!(%region, tag = %tag_key, "group discovery configured");

        let resolver = AddressResolver::new(config.clone());
        Ok(Self {
            config,
            groups,
            compute,
            resolver,
            region,
        })
    }

    /// Tag key re-read per poll, so operators can repoint discovery without
    /// a restart.
    fn tag_key(&self) -> Result<String> {
        let tag_key = self.config.get_or(GROUP_TAG_PROPERTY, "");
        if tag_key.is_empty() {
            return Err(Error::Configuration(format!(
                "{GROUP_TAG_PROPERTY} is no longer set"
            )));
        }
        Ok(tag_key)
    }

    async fn poll(&self) -> Result<Vec<ClusterInstance>> {
        let tag_key = self.tag_key()?;

        let mut records = Vec::new();
        for group in self.find_groups(&tag_key).await? {
            records.extend(self.group_records(&tag_key, &group).await?);
        }
        Ok(records)
    }

    /// Scaling groups carrying the tag key with a non-empty value, across
    /// every page of the listing.
    async fn find_groups(&self, tag_key: &str) -> Result<Vec<ScalingGroup>> {
        let mut matched = Vec::new();
        let mut token = None;

        loop {
            let page = self.groups.list_groups(token).await?;
            matched.extend(
                page.groups
                    .into_iter()
                    .filter(|g| cluster_tag(g, tag_key).is_some()),
            );

            token = continuation(page.next_token);
            if token.is_none() {
                break;
            }
        }

        Ok(matched)
    }

    /// Records for one group's members: a single batched detail lookup,
    /// keeping only instances the provider assigned a public DNS name.
    async fn group_records(
        &self,
        tag_key: &str,
        group: &ScalingGroup,
    ) -> Result<Vec<ClusterInstance>> {
        let Some(cluster) = cluster_tag(group, tag_key) else {
            return Ok(Vec::new());
        };

        // An empty id list must not widen into a describe-everything call.
        if group.instance_ids.is_empty() {
            return Ok(Vec::new());
        }

        let details = self.compute.describe_instances(&group.instance_ids).await?;
        Ok(details
            .iter()
            .filter(|i| !i.public_dns_name.is_empty())
            .map(|i| self.resolver.resolve(cluster, i))
            .collect())
    }
}

/// Value of the first tag matching `tag_key` in provider order, skipping
/// empty values.
fn cluster_tag<'a>(group: &'a ScalingGroup, tag_key: &str) -> Option<&'a str> {
    group
        .tags
        .iter()
        .find(|t| t.key == tag_key && !t.value.is_empty())
        .map(|t| t.value.as_str())
}

#[async_trait]
impl InstanceDiscovery for GroupTagDiscovery {
    fn name(&self) -> &str {
        "group"
    }

    /// Never fails: any error inside the poll is logged and the source
    /// contributes nothing this cycle. Partial progress is discarded.
    async fn discover(&self) -> Result<Vec<ClusterInstance>> {
        match self.poll().await {
            Ok(records) => {
                debug!(count = records.len(), "group discovery poll complete");
                Ok(records)
            }
            Err(e) => {
                let tag_key = self.config.get_or(GROUP_TAG_PROPERTY, "");
                error!(
                    tag = %tag_key,
                    region = %self.region,
                    error = %e,
                    "failed to discover instances for tagged scaling groups"
                );
                Ok(Vec::new())
            }
        }
    }
}
