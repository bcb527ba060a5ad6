//! Pool descriptors
//!
//! A descriptor declares one pool: the template to clone, how many instances
//! to prewarm, an optional string key and the prewarm strategy. Descriptors
//! are validated on construction so the registry never sees a zero count.

use crate::error::{PoolError, PoolResult};
use crate::host::PoolTemplate;
use crate::key::PoolKey;
use serde::{Deserialize, Serialize};

/// How a pool is filled ahead of demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrewarmStrategy {
    /// One instance per scheduler tick, cancelable
    #[default]
    Incremental,
    /// The whole batch during initialization
    Immediate,
}

/// Declaration of a single pool
#[derive(Debug, Clone)]
pub struct PoolDescriptor<T> {
    template: T,
    count: usize,
    key: Option<String>,
    prewarm: PrewarmStrategy,
}

impl<T: PoolTemplate> PoolDescriptor<T> {
    /// Create a type-keyed descriptor prewarming `count` instances
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidDescriptor`] when `count` is zero.
    pub fn new(template: T, count: usize) -> PoolResult<Self> {
        if count == 0 {
            return Err(PoolError::InvalidDescriptor {
                reason: format!("template '{}' must prewarm at least one instance", template.name()),
            });
        }

        Ok(Self {
            template,
            count,
            key: None,
            prewarm: PrewarmStrategy::default(),
        })
    }

    /// Address the pool by a string key instead of its payload type
    ///
    /// An empty key leaves the pool type-keyed.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.key = if key.is_empty() { None } else { Some(key) };
        self
    }

    /// Set the prewarm strategy
    pub fn with_prewarm(mut self, prewarm: PrewarmStrategy) -> Self {
        self.prewarm = prewarm;
        self
    }

    /// Key the pool will be registered under
    pub fn pool_key(&self) -> PoolKey {
        match &self.key {
            Some(key) => PoolKey::Named(key.clone()),
            None => PoolKey::Type(self.template.type_key()),
        }
    }

    /// Name of the container this pool's instances are parented under
    pub fn container_name(&self) -> String {
        let type_name = self.template.type_key().short_name();
        match &self.key {
            Some(key) => format!("\"{key}\"<{type_name}>"),
            None => format!("<{type_name}>"),
        }
    }

    /// Template to clone
    pub fn template(&self) -> &T {
        &self.template
    }

    /// Number of instances to prewarm
    pub fn count(&self) -> usize {
        self.count
    }

    /// Explicit string key, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Prewarm strategy
    pub fn prewarm(&self) -> PrewarmStrategy {
        self.prewarm
    }

    pub(crate) fn into_template(self) -> T {
        self.template
    }
}
