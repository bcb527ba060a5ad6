//! Pool registry
//!
//! [`ObjectPool`] owns every pool, keyed by [`PoolKey`], together with an
//! ownership index from instance to pool. It is built once from a descriptor
//! set and then serves checkouts, returns and incremental prewarm ticks.
//!
//! # Initialization
//!
//! ```text
//! descriptors ─┬─ register ──► root container ─► "<Type>" / "\"key\"<Type>" containers
//!              │
//!              └─ prewarm ───► Immediate:   whole batch now
//!                              Incremental: queued, one instance per tick
//! ```
//!
//! A descriptor whose key is already taken is dropped and recorded as a
//! [`PoolError::DuplicateKey`] diagnostic. The first registration wins and
//! the remaining descriptors are still processed.

use crate::config::PoolSettings;
use crate::descriptor::{PoolDescriptor, PrewarmStrategy};
use crate::error::{PoolError, PoolResult};
use crate::host::PoolHost;
use crate::key::PoolKey;
use crate::pool::{Pool, PoolStats};
use crate::prewarm::{PrewarmJob, PrewarmQueue};
use std::collections::HashMap;

/// Upper bound on the inactive set capacity reserved at registration
pub const MAX_CAPACITY_HINT: usize = 4096;

/// Keyed collection of recycling pools
pub struct ObjectPool<H: PoolHost> {
    pub(crate) root: H::Container,
    pub(crate) settings: PoolSettings,
    pub(crate) pools: HashMap<PoolKey, Pool<H>>,
    /// Owning pool of every instance ever constructed. Never rewritten.
    pub(crate) owners: HashMap<H::Instance, PoolKey>,
    pub(crate) prewarm: PrewarmQueue,
    diagnostics: Vec<PoolError>,
}

impl<H: PoolHost> ObjectPool<H> {
    /// Build the pools described by `descriptors` with default settings
    pub fn initialize<I>(host: &mut H, descriptors: I) -> Self
    where
        I: IntoIterator<Item = PoolDescriptor<H::Template>>,
    {
        Self::with_settings(host, PoolSettings::default(), descriptors)
    }

    /// Build the pools described by `descriptors`
    ///
    /// Immediate descriptors are fully prewarmed before this returns.
    /// Incremental descriptors are queued for [`ObjectPool::prewarm_tick`].
    pub fn with_settings<I>(host: &mut H, settings: PoolSettings, descriptors: I) -> Self
    where
        I: IntoIterator<Item = PoolDescriptor<H::Template>>,
    {
        let root = host.create_container(&settings.root_name, None);
        let mut pool = Self {
            root,
            settings,
            pools: HashMap::new(),
            owners: HashMap::new(),
            prewarm: PrewarmQueue::default(),
            diagnostics: Vec::new(),
        };

        let mut registered = Vec::new();
        for (index, descriptor) in descriptors.into_iter().enumerate() {
            let count = descriptor.count();
            let strategy = descriptor.prewarm();
            match pool.register(host, index, descriptor) {
                Ok(key) => registered.push((key, count, strategy)),
                Err(err) => {
                    log::error!("{}", err);
                    pool.diagnostics.push(err);
                }
            }
        }

        for (key, count, strategy) in registered {
            match strategy {
                PrewarmStrategy::Immediate => pool.prewarm_immediate(host, &key, count),
                PrewarmStrategy::Incremental => pool.prewarm.push(PrewarmJob::new(key, count)),
            }
        }

        log::info!(
            "Initialized {} pools under '{}' ({} queued for incremental prewarm, {} diagnostics)",
            pool.pools.len(),
            pool.settings.root_name,
            pool.prewarm.len(),
            pool.diagnostics.len()
        );
        if !pool.prewarm.is_empty() {
            log::info!("Incremental prewarm started");
        }

        pool
    }

    fn register(&mut self, host: &mut H, index: usize, descriptor: PoolDescriptor<H::Template>) -> PoolResult<PoolKey> {
        let key = descriptor.pool_key();
        if self.pools.contains_key(&key) {
            return Err(PoolError::DuplicateKey { key, index });
        }

        let container = host.create_container(&descriptor.container_name(), Some(self.root));
        let capacity = descriptor
            .count()
            .saturating_mul(self.settings.capacity_factor)
            .min(MAX_CAPACITY_HINT);
        let template = descriptor.into_template();

        log::debug!("Registered pool {} with capacity hint {}", key, capacity);
        self.pools.insert(key.clone(), Pool::new(key.clone(), template, container, capacity));
        Ok(key)
    }

    pub(crate) fn pool(&self, key: &PoolKey) -> PoolResult<&Pool<H>> {
        self.pools
            .get(key)
            .ok_or_else(|| PoolError::PoolNotFound { key: key.clone() })
    }

    /// Whether a pool is registered under `key`
    pub fn contains_pool(&self, key: &PoolKey) -> bool {
        self.pools.contains_key(key)
    }

    /// Keys of all registered pools, in no particular order
    pub fn pool_keys(&self) -> impl Iterator<Item = &PoolKey> {
        self.pools.keys()
    }

    /// Number of registered pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pool is registered
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Instances waiting for reuse in the pool under `key`
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolNotFound`] for an unknown key.
    pub fn inactive_count(&self, key: &PoolKey) -> PoolResult<usize> {
        Ok(self.pool(key)?.inactive_len())
    }

    /// Instances currently checked out from the pool under `key`
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolNotFound`] for an unknown key.
    pub fn active_count(&self, key: &PoolKey) -> PoolResult<usize> {
        Ok(self.pool(key)?.active_len())
    }

    /// Usage counters of the pool under `key`
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolNotFound`] for an unknown key.
    pub fn stats(&self, key: &PoolKey) -> PoolResult<PoolStats> {
        Ok(self.pool(key)?.stats())
    }

    /// Container the pool under `key` parents its instances to
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolNotFound`] for an unknown key.
    pub fn container(&self, key: &PoolKey) -> PoolResult<H::Container> {
        Ok(self.pool(key)?.container())
    }

    /// Container every pool container is attached under
    pub fn root(&self) -> H::Container {
        self.root
    }

    /// Settings this registry was built with
    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Key of the pool that constructed `instance`
    pub fn owner_of(&self, instance: H::Instance) -> Option<&PoolKey> {
        self.owners.get(&instance)
    }

    /// Whether `instance` is currently checked out
    pub fn is_active(&self, instance: H::Instance) -> bool {
        self.owners
            .get(&instance)
            .and_then(|key| self.pools.get(key))
            .is_some_and(|pool| pool.is_active(instance))
    }

    /// Whether `instance` is waiting for reuse
    pub fn is_inactive(&self, instance: H::Instance) -> bool {
        self.owners
            .get(&instance)
            .and_then(|key| self.pools.get(key))
            .is_some_and(|pool| pool.is_inactive(instance))
    }

    /// Problems recorded while processing the descriptor set
    pub fn diagnostics(&self) -> &[PoolError] {
        &self.diagnostics
    }

    /// Construct one instance for the pool under `key` and park it inactive
    pub(crate) fn construct_inactive(&mut self, host: &mut H, key: &PoolKey) -> Option<H::Instance> {
        let pool = self.pools.get_mut(key)?;
        let instance = pool.construct(host);
        host.set_enabled(instance, false);
        pool.store_inactive(instance);
        self.owners.insert(instance, key.clone());
        Some(instance)
    }
}
