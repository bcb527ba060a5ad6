//! # Prefab Pool
//!
//! Keyed object recycling for game scenes. Instead of building a new object
//! every time one is needed, the pool hands out a previously built, currently
//! unused instance and takes it back when the caller is done with it.
//!
//! ## Features
//!
//! - **Dual addressing**: pools are keyed by payload type or by an explicit string key
//! - **Lazy growth**: an empty pool constructs on demand, it never refuses a checkout
//! - **Prewarming**: fill pools during initialization or one instance per tick
//! - **Host agnostic**: construction, activation and parenting go through [`PoolHost`]
//! - **Declarative setup**: pool manifests in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! struct Bullet;
//!
//! let mut scene = Scene::new();
//! let descriptors = vec![
//!     PoolDescriptor::new(Prefab::new::<Bullet>("bullet"), 8)?
//!         .with_prewarm(PrewarmStrategy::Immediate),
//! ];
//! let mut pool = ObjectPool::initialize(&mut scene, descriptors);
//!
//! let bullet = pool.get::<Bullet>(&mut scene)?;
//! assert!(scene.is_enabled(bullet.instance()));
//!
//! pool.release(&mut scene, bullet.instance());
//! assert_eq!(pool.inactive_count(&PoolKey::of::<Bullet>())?, 8);
//! # Ok::<(), PoolError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod checkout;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod key;
pub mod logging;
pub mod prewarm;
pub mod registry;
pub mod scene;

mod pool;

#[cfg(test)]
mod tests;

pub use checkout::ReleaseOutcome;
pub use descriptor::{PoolDescriptor, PrewarmStrategy};
pub use error::{PoolError, PoolResult};
pub use host::{PoolHost, PoolTemplate, Pooled};
pub use key::{PoolKey, TypeKey};
pub use pool::PoolStats;
pub use registry::ObjectPool;

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        checkout::ReleaseOutcome,
        config::{Config, ConfigError, PoolEntry, PoolManifest, PoolSettings, TemplateCatalog},
        descriptor::{PoolDescriptor, PrewarmStrategy},
        error::{PoolError, PoolResult},
        host::{PoolHost, PoolTemplate, Pooled},
        key::{PoolKey, TypeKey},
        pool::PoolStats,
        prewarm::PrewarmProgress,
        registry::ObjectPool,
        scene::{NodeId, Prefab, Scene},
    };
}
