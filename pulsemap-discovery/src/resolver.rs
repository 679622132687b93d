//! Maps provider instance details onto canonical cluster records.

use std::sync::Arc;

use tracing::warn;

use pulsemap_core::ConfigProvider;

use crate::cloud::ComputeInstance;
use crate::types::ClusterInstance;

/// Configuration key for the global address-field policy. A per-cluster
/// override lives under `discovery.host_field.<cluster>`.
pub const HOST_FIELD_PROPERTY: &str = "discovery.host_field";

/// Policy applied when nothing is configured or the configured value is not
/// recognized.
pub const DEFAULT_HOST_FIELD: &str = "private_ip";

/// Provider state that maps to an up host. Exact match; the provider
/// reports lowercase state names.
const RUNNING_STATE: &str = "running";

/// Which provider address field becomes the canonical hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostField {
    PrivateDns,
    PrivateIp,
    PublicDns,
    PublicIp,
}

impl HostField {
    /// Parse a policy value, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "private_dns" => Some(Self::PrivateDns),
            "private_ip" => Some(Self::PrivateIp),
            "public_dns" => Some(Self::PublicDns),
            "public_ip" => Some(Self::PublicIp),
            _ => None,
        }
    }

    fn select(self, instance: &ComputeInstance) -> &str {
        match self {
            Self::PrivateDns => &instance.private_dns_name,
            Self::PrivateIp => &instance.private_ip_address,
            Self::PublicDns => &instance.public_dns_name,
            Self::PublicIp => &instance.public_ip_address,
        }
    }
}

/// Stateless mapper from provider instance details to [`ClusterInstance`].
///
/// Holds no mutable state, so sources share it or own their own copy
/// interchangeably. The address-field policy is re-read from configuration
/// on every resolution.
#[derive(Clone)]
pub struct AddressResolver {
    config: Arc<dyn ConfigProvider>,
}

impl AddressResolver {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self { config }
    }

    /// Build the canonical record for one instance of `cluster`.
    ///
    /// The selected address is passed through verbatim, even when the
    /// provider left it empty; callers decide whether to filter.
    pub fn resolve(&self, cluster: &str, instance: &ComputeInstance) -> ClusterInstance {
        let policy = self.host_field_policy(cluster);
        let field = HostField::parse(&policy).unwrap_or_else(|| {
            warn!(
                value = %policy,
                property = HOST_FIELD_PROPERTY,
                "not a valid host field, expected one of [private_dns, private_ip, \
                 public_dns, public_ip]; falling back to private_ip"
            );
            HostField::PrivateIp
        });

        ClusterInstance::new(
            field.select(instance),
            cluster,
            instance.state == RUNNING_STATE,
        )
    }

    /// Per-cluster override first, global policy second, built-in default
    /// last.
    fn host_field_policy(&self, cluster: &str) -> String {
        let override_key = format!("{HOST_FIELD_PROPERTY}.{cluster}");
        match self.config.get(&override_key) {
            Some(value) if !value.is_empty() => value,
            _ => self.config.get_or(HOST_FIELD_PROPERTY, DEFAULT_HOST_FIELD),
        }
    }
}
