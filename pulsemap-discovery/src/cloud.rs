//! Provider-facing model and client contracts.
//!
//! The concrete cloud client (SDK wrapper, signed HTTP, regional endpoint
//! selection) belongs to the embedding application and is injected behind
//! these traits. Listing calls are paginated with an opaque continuation
//! token; `None` or an empty token means the listing is exhausted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Key/value tag attached to a cloud resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

impl ResourceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A managed scaling group: a named, dynamically-sized set of member
/// instances under a common lifecycle policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalingGroup {
    pub name: String,
    pub tags: Vec<ResourceTag>,
    pub instance_ids: Vec<String>,
}

/// One page of a scaling-group listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupPage {
    pub groups: Vec<ScalingGroup>,
    pub next_token: Option<String>,
}

/// Compute instance details as reported by the provider.
///
/// Address fields are empty strings when the provider has not assigned
/// them, e.g. no public DNS name for an instance outside a public subnet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeInstance {
    pub id: String,
    /// Provider lifecycle state, e.g. "pending", "running", "stopped".
    pub state: String,
    pub private_dns_name: String,
    pub private_ip_address: String,
    pub public_dns_name: String,
    pub public_ip_address: String,
    pub tags: Vec<ResourceTag>,
}

/// One page of a compute-instance listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstancePage {
    pub instances: Vec<ComputeInstance>,
    pub next_token: Option<String>,
}

/// Listing API for managed scaling groups.
#[async_trait]
pub trait ScalingGroupsApi: Send + Sync {
    /// Fetch one page of groups. Pass the token returned by the previous
    /// page to continue; `None` starts from the beginning.
    async fn list_groups(&self, next_token: Option<String>) -> Result<GroupPage>;
}

/// Query API for compute instances.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Batched detail lookup for the given instance ids.
    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<ComputeInstance>>;

    /// Fetch one page of instances carrying `tag_key`, in provider order.
    async fn list_instances_by_tag(
        &self,
        tag_key: &str,
        next_token: Option<String>,
    ) -> Result<InstancePage>;
}

/// Normalizes a returned continuation token: an empty token means the
/// listing is exhausted, same as no token at all.
pub(crate) fn continuation(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}
