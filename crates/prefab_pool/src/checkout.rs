//! Checkout and return
//!
//! `get` hands out an arbitrary inactive instance, constructing a new one
//! when the pool is empty. `release` parks an instance back in the pool that
//! built it. Neither call suspends.

use crate::error::{PoolError, PoolResult};
use crate::host::{PoolHost, Pooled};
use crate::key::{PoolKey, TypeKey};
use crate::registry::ObjectPool;

/// Result of handing an instance back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The instance is inactive again in the pool under this key
    Returned(PoolKey),
    /// The instance was not checked out from any pool; nothing changed
    Unregistered,
}

impl ReleaseOutcome {
    /// Whether the instance went back into a pool
    pub fn is_returned(&self) -> bool {
        matches!(self, Self::Returned(_))
    }
}

impl<H: PoolHost> ObjectPool<H> {
    /// Check out an instance from the pool keyed by payload type `T`
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolNotFound`] when no type-keyed pool exists for `T`.
    pub fn get<T: 'static>(&mut self, host: &mut H) -> PoolResult<Pooled<T, H::Instance>> {
        let instance = self.checkout(host, &PoolKey::of::<T>())?;
        Ok(Pooled::new(instance))
    }

    /// Check out an instance from the pool registered under string `key`
    ///
    /// The payload type is checked before anything leaves the pool, so a
    /// mismatch leaves the pool untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolNotFound`] for an unknown key and
    /// [`PoolError::TypeMismatch`] when the pool holds a payload other than `T`.
    pub fn get_keyed<T: 'static>(&mut self, host: &mut H, key: &str) -> PoolResult<Pooled<T, H::Instance>> {
        let key = PoolKey::named(key);
        let expected = TypeKey::of::<T>();
        let actual = self.pool(&key)?.content_type();
        if actual != expected {
            return Err(PoolError::TypeMismatch { key, expected, actual });
        }

        let instance = self.checkout(host, &key)?;
        Ok(Pooled::new(instance))
    }

    fn checkout(&mut self, host: &mut H, key: &PoolKey) -> PoolResult<H::Instance> {
        let pool = self
            .pools
            .get_mut(key)
            .ok_or_else(|| PoolError::PoolNotFound { key: key.clone() })?;

        let instance = if let Some(instance) = pool.take_inactive() {
            host.set_enabled(instance, true);
            instance
        } else {
            let instance = pool.construct_lazily(host);
            self.owners.insert(instance, key.clone());
            log::debug!("Pool {} was empty, constructed {:?}", pool.key(), instance);
            instance
        };

        pool.mark_active(instance);
        Ok(instance)
    }

    /// Return a checked out instance to its pool
    ///
    /// Instances that are not checked out (never pooled, or already returned)
    /// are reported as [`ReleaseOutcome::Unregistered`] and left alone.
    pub fn release(&mut self, host: &mut H, instance: H::Instance) -> ReleaseOutcome {
        let Some(key) = self.owners.get(&instance) else {
            log::warn!("Can't return {}, it was never registered with a pool", host.describe(instance));
            return ReleaseOutcome::Unregistered;
        };

        let Some(pool) = self.pools.get_mut(key) else {
            return ReleaseOutcome::Unregistered;
        };

        if !pool.mark_inactive(instance) {
            log::warn!("Can't return {}, it is not checked out from {}", host.describe(instance), key);
            return ReleaseOutcome::Unregistered;
        }

        host.set_parent(instance, pool.container());
        host.set_enabled(instance, false);
        ReleaseOutcome::Returned(key.clone())
    }

    /// Return a typed handle obtained from [`ObjectPool::get`] or [`ObjectPool::get_keyed`]
    pub fn release_pooled<T>(&mut self, host: &mut H, pooled: Pooled<T, H::Instance>) -> ReleaseOutcome {
        self.release(host, pooled.into_instance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PoolDescriptor, PrewarmStrategy};
    use crate::scene::{Prefab, Scene};

    struct Bullet;
    struct Spark;

    fn bullet_pool(scene: &mut Scene, count: usize) -> ObjectPool<Scene> {
        let descriptors = vec![
            PoolDescriptor::new(Prefab::new::<Bullet>("bullet"), count)
                .expect("Should build descriptor")
                .with_prewarm(PrewarmStrategy::Immediate),
            PoolDescriptor::new(Prefab::new::<Spark>("muzzle_flash"), count)
                .expect("Should build descriptor")
                .with_key("muzzle")
                .with_prewarm(PrewarmStrategy::Immediate),
        ];
        ObjectPool::initialize(scene, descriptors)
    }

    #[test]
    fn test_get_reuses_inactive_instance() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 2);
        let key = PoolKey::of::<Bullet>();

        let bullet = pool.get::<Bullet>(&mut scene).expect("Should check out");
        assert_eq!(pool.inactive_count(&key), Ok(1));
        assert_eq!(pool.active_count(&key), Ok(1));
        assert!(scene.is_enabled(bullet.instance()));
        assert!(pool.is_active(bullet.instance()));
        assert_eq!(pool.stats(&key).expect("Should exist").constructed_lazily, 0);
    }

    #[test]
    fn test_get_constructs_when_exhausted() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);
        let key = PoolKey::of::<Bullet>();

        let first = pool.get::<Bullet>(&mut scene).expect("Should check out");
        let second = pool.get::<Bullet>(&mut scene).expect("Should construct");

        assert_ne!(first, second);
        assert_eq!(pool.active_count(&key), Ok(2));
        assert_eq!(pool.inactive_count(&key), Ok(0));
        assert!(scene.is_enabled(second.instance()));
        assert_eq!(scene.parent_of(second.instance()), pool.container(&key).ok());

        let stats = pool.stats(&key).expect("Should exist");
        assert_eq!(stats.constructed, 2);
        assert_eq!(stats.constructed_lazily, 1);
        assert_eq!(stats.peak_active, 2);
    }

    #[test]
    fn test_get_unknown_type_fails() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);

        let result = pool.get::<String>(&mut scene);
        assert_eq!(result, Err(PoolError::PoolNotFound { key: PoolKey::of::<String>() }));
    }

    #[test]
    fn test_type_keyspace_ignores_string_pools() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);

        // Spark only exists under the "muzzle" key.
        assert!(matches!(pool.get::<Spark>(&mut scene), Err(PoolError::PoolNotFound { .. })));
        assert!(pool.get_keyed::<Spark>(&mut scene, "muzzle").is_ok());
    }

    #[test]
    fn test_get_keyed_unknown_key_fails() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);

        let result = pool.get_keyed::<Spark>(&mut scene, "exhaust");
        assert_eq!(result, Err(PoolError::PoolNotFound { key: PoolKey::named("exhaust") }));
    }

    #[test]
    fn test_get_keyed_type_mismatch_leaves_pool_untouched() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 2);
        let key = PoolKey::named("muzzle");

        let result = pool.get_keyed::<Bullet>(&mut scene, "muzzle");
        assert_eq!(
            result,
            Err(PoolError::TypeMismatch {
                key: key.clone(),
                expected: TypeKey::of::<Bullet>(),
                actual: TypeKey::of::<Spark>(),
            })
        );
        assert_eq!(pool.inactive_count(&key), Ok(2));
        assert_eq!(pool.active_count(&key), Ok(0));
    }

    #[test]
    fn test_release_parks_instance() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);
        let key = PoolKey::named("muzzle");

        let spark = pool.get_keyed::<Spark>(&mut scene, "muzzle").expect("Should check out");
        let elsewhere = scene.create_node("World", None);
        scene.reparent(spark.instance(), elsewhere);

        let outcome = pool.release_pooled(&mut scene, spark);
        assert_eq!(outcome, ReleaseOutcome::Returned(key.clone()));
        assert!(!scene.is_enabled(spark.instance()));
        assert_eq!(scene.parent_of(spark.instance()), pool.container(&key).ok());
        assert!(pool.is_inactive(spark.instance()));
        assert!(!pool.is_active(spark.instance()));
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);
        let key = PoolKey::of::<Bullet>();

        let bullet = pool.get::<Bullet>(&mut scene).expect("Should check out");
        assert!(pool.release(&mut scene, bullet.instance()).is_returned());
        assert_eq!(pool.release(&mut scene, bullet.instance()), ReleaseOutcome::Unregistered);

        assert_eq!(pool.inactive_count(&key), Ok(1));
        assert_eq!(pool.stats(&key).expect("Should exist").returns, 1);
    }

    #[test]
    fn test_release_foreign_instance_is_noop() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);

        let stray = scene.create_node("Stray", None);
        assert_eq!(pool.release(&mut scene, stray), ReleaseOutcome::Unregistered);
        assert!(scene.is_enabled(stray));
    }

    #[test]
    fn test_release_of_inactive_instance_is_noop() {
        let mut scene = Scene::new();
        let mut pool = bullet_pool(&mut scene, 1);
        let key = PoolKey::of::<Bullet>();

        let bullet = pool.get::<Bullet>(&mut scene).expect("Should check out");
        pool.release(&mut scene, bullet.instance());
        let parked = pool.get::<Bullet>(&mut scene).expect("Should check out");
        assert_eq!(parked, bullet);
        pool.release(&mut scene, parked.instance());

        assert_eq!(pool.release(&mut scene, parked.instance()), ReleaseOutcome::Unregistered);
        assert_eq!(pool.inactive_count(&key), Ok(1));
    }
}
