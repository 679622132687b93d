//! Runtime configuration read contract
//!
//! Discovery settings are operator-tunable while the process is running, so
//! consumers hold a [`ConfigProvider`] and re-read keys on every access
//! instead of caching values at construction.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Read access to a live key-value configuration store.
///
/// Implementations must return the current value on every call; callers are
/// expected not to cache results across polls.
pub trait ConfigProvider: Send + Sync {
    /// Current value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Current value for `key`, or `default` when the key is unset or empty.
    fn get_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(value) if !value.is_empty() => value,
            _ => default.to_string(),
        }
    }
}

/// In-memory configuration store, mutable at runtime.
///
/// The embedding application owns one of these (typically behind an `Arc`)
/// and pushes updated values into it; readers observe changes on their next
/// access.
#[derive(Debug, Default)]
pub struct MemoryConfig {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Set or replace a value; visible to readers immediately.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Remove a key, returning the previous value if any.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }
}

impl ConfigProvider for MemoryConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

/// Configuration backed by the process environment.
///
/// Dotted keys map to upper-snake variable names (`discovery.group.tag`
/// becomes `DISCOVERY_GROUP_TAG`). The environment is consulted on every
/// access, so variables updated through an external mechanism are picked up
/// without a restart.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig;

impl EnvConfig {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn var_name(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                _ => c.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl ConfigProvider for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(Self::var_name(key)).ok()
    }
}
