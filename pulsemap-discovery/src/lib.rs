pub mod cloud;
pub mod composite;
pub mod error;
pub mod resolver;
pub mod source;
pub mod types;

#[cfg(test)]
pub mod test_helpers;

pub use cloud::{ComputeApi, ComputeInstance, GroupPage, InstancePage, ResourceTag, ScalingGroup, ScalingGroupsApi};
pub use composite::CompositeDiscovery;
pub use error::{Error, Result};
pub use resolver::{AddressResolver, HostField};
pub use source::group::GroupTagDiscovery;
pub use source::instance::InstanceTagDiscovery;
pub use source::{InstanceDiscovery, SourceContext, SourceRegistry};
pub use types::{cluster_names, ClusterInstance};
