//! Shared stubs and fixtures for discovery tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pulsemap_core::{ConfigProvider, MemoryConfig};

use crate::cloud::{
    ComputeApi, ComputeInstance, GroupPage, InstancePage, ResourceTag, ScalingGroup,
    ScalingGroupsApi,
};
use crate::error::{Error, Result};
use crate::source::{InstanceDiscovery, SourceContext};
use crate::types::ClusterInstance;

/// Config provider seeded with the given pairs.
pub fn config_with(pairs: &[(&str, &str)]) -> Arc<dyn ConfigProvider> {
    Arc::new(MemoryConfig::from_pairs(pairs.iter().copied()))
}

/// Source context over empty stub clients and the given config pairs.
pub fn stub_context(pairs: &[(&str, &str)]) -> SourceContext {
    SourceContext::new(
        config_with(pairs),
        Arc::new(StubGroupsApi::with_pages(Vec::new())),
        Arc::new(StubComputeApi::new()),
    )
}

/// Fixture builder for scaling groups.
pub struct GroupFixture {
    inner: ScalingGroup,
}

impl GroupFixture {
    pub fn new(name: &str) -> Self {
        Self {
            inner: ScalingGroup {
                name: name.to_string(),
                tags: Vec::new(),
                instance_ids: Vec::new(),
            },
        }
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.inner.tags.push(ResourceTag::new(key, value));
        self
    }

    pub fn members(mut self, ids: &[&str]) -> Self {
        self.inner.instance_ids = ids.iter().map(ToString::to_string).collect();
        self
    }

    pub fn build(self) -> ScalingGroup {
        self.inner
    }
}

/// Fixture builder for provider instances.
///
/// Defaults to a running instance with every address field populated.
pub struct InstanceFixture {
    inner: ComputeInstance,
}

impl InstanceFixture {
    pub fn new(id: &str) -> Self {
        Self {
            inner: ComputeInstance {
                id: id.to_string(),
                state: "running".to_string(),
                private_dns_name: format!("{id}.internal.example.com"),
                private_ip_address: "10.0.0.10".to_string(),
                public_dns_name: format!("{id}.public.example.com"),
                public_ip_address: "54.0.0.10".to_string(),
                tags: Vec::new(),
            },
        }
    }

    pub fn state(mut self, state: &str) -> Self {
        self.inner.state = state.to_string();
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.inner.tags.push(ResourceTag::new(key, value));
        self
    }

    pub fn public_dns(mut self, value: &str) -> Self {
        self.inner.public_dns_name = value.to_string();
        self
    }

    pub fn private_ip(mut self, value: &str) -> Self {
        self.inner.private_ip_address = value.to_string();
        self
    }

    pub fn build(self) -> ComputeInstance {
        self.inner
    }
}

/// Scripted scaling-group listing: serves the configured pages in call
/// order, then empty pages.
pub struct StubGroupsApi {
    pages: Vec<GroupPage>,
    calls: Mutex<usize>,
    fail: bool,
}

impl StubGroupsApi {
    pub fn with_pages(pages: Vec<GroupPage>) -> Self {
        Self {
            pages,
            calls: Mutex::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            pages: Vec::new(),
            calls: Mutex::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ScalingGroupsApi for StubGroupsApi {
    async fn list_groups(&self, _next_token: Option<String>) -> Result<GroupPage> {
        if self.fail {
            return Err(Error::Provider("group listing unavailable".to_string()));
        }
        let mut calls = self.calls.lock().unwrap();
        let page = self.pages.get(*calls).cloned().unwrap_or_default();
        *calls += 1;
        Ok(page)
    }
}

/// Scripted compute API.
///
/// Detail lookups answer from instances registered with [`put_instance`],
/// falling back to the [`InstanceFixture`] default for unknown ids, and
/// record every requested id set. Tag listings serve the configured pages
/// in call order.
///
/// [`put_instance`]: StubComputeApi::put_instance
pub struct StubComputeApi {
    instances: Mutex<HashMap<String, ComputeInstance>>,
    pages: Vec<InstancePage>,
    list_calls: Mutex<usize>,
    describe_requests: Mutex<Vec<Vec<String>>>,
    fail_describe: bool,
    fail_list: bool,
}

impl StubComputeApi {
    pub fn new() -> Self {
        Self::with_instance_pages(Vec::new())
    }

    pub fn with_instance_pages(pages: Vec<InstancePage>) -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            pages,
            list_calls: Mutex::new(0),
            describe_requests: Mutex::new(Vec::new()),
            fail_describe: false,
            fail_list: false,
        }
    }

    pub fn failing_describe() -> Self {
        Self {
            fail_describe: true,
            ..Self::new()
        }
    }

    pub fn failing_list() -> Self {
        Self {
            fail_list: true,
            ..Self::new()
        }
    }

    /// Register the instance returned by detail lookups for its id.
    pub fn put_instance(&self, instance: ComputeInstance) {
        self.instances
            .lock()
            .unwrap()
            .insert(instance.id.clone(), instance);
    }

    /// Every id set passed to `describe_instances`, in call order.
    pub fn describe_requests(&self) -> Vec<Vec<String>> {
        self.describe_requests.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

impl Default for StubComputeApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComputeApi for StubComputeApi {
    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<ComputeInstance>> {
        self.describe_requests
            .lock()
            .unwrap()
            .push(instance_ids.to_vec());

        if self.fail_describe {
            return Err(Error::Provider("describe unavailable".to_string()));
        }

        let instances = self.instances.lock().unwrap();
        Ok(instance_ids
            .iter()
            .map(|id| {
                instances
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| InstanceFixture::new(id).build())
            })
            .collect())
    }

    async fn list_instances_by_tag(
        &self,
        _tag_key: &str,
        _next_token: Option<String>,
    ) -> Result<InstancePage> {
        if self.fail_list {
            return Err(Error::Provider("instance listing unavailable".to_string()));
        }
        let mut calls = self.list_calls.lock().unwrap();
        let page = self.pages.get(*calls).cloned().unwrap_or_default();
        *calls += 1;
        Ok(page)
    }
}

/// Discovery source with a fixed answer, for composite tests.
pub struct StaticSource {
    name: &'static str,
    records: Vec<ClusterInstance>,
    fail: bool,
}

impl StaticSource {
    /// Source returning one up record per `(hostname, cluster)` pair.
    pub fn up(name: &'static str, hosts: &[(&str, &str)]) -> Self {
        Self {
            name,
            records: hosts
                .iter()
                .map(|(hostname, cluster)| ClusterInstance::new(*hostname, *cluster, true))
                .collect(),
            fail: false,
        }
    }

    /// Source whose every poll fails.
    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            records: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl InstanceDiscovery for StaticSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn discover(&self) -> Result<Vec<ClusterInstance>> {
        if self.fail {
            return Err(Error::Provider("intentional test failure".to_string()));
        }
        Ok(self.records.clone())
    }
}
