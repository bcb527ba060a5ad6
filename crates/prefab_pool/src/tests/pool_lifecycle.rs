//! Pool lifecycle tests
//!
//! Drives whole pools through manifests, prewarm ticks and long get/release
//! sequences, checking membership after every step.

use crate::config::{Config, PoolManifest};
use crate::error::PoolError;
use crate::host::PoolTemplate;
use crate::key::PoolKey;
use crate::registry::ObjectPool;
use crate::scene::{NodeId, Prefab, Scene};
use std::collections::HashMap;

struct Bullet;
struct Asteroid;
struct Explosion;

fn catalog() -> HashMap<String, Prefab> {
    [
        Prefab::new::<Bullet>("bullet"),
        Prefab::new::<Asteroid>("asteroid"),
        Prefab::new::<Explosion>("explosion"),
    ]
    .into_iter()
    .map(|prefab| (prefab.name().to_string(), prefab))
    .collect()
}

/// Every constructed instance sits in exactly one of its pool's sets, and the
/// sets add up to everything that pool ever constructed.
fn assert_membership(pool: &ObjectPool<Scene>, instances: &[NodeId]) {
    for &instance in instances {
        assert!(
            pool.is_active(instance) ^ pool.is_inactive(instance),
            "{instance:?} must be in exactly one set"
        );
    }

    let keys: Vec<PoolKey> = pool.pool_keys().cloned().collect();
    for key in &keys {
        let stats = pool.stats(key).expect("Should exist");
        let active = pool.active_count(key).expect("Should exist");
        let inactive = pool.inactive_count(key).expect("Should exist");
        assert_eq!(active + inactive, stats.constructed, "pool {key}");
        assert_eq!(active, stats.active, "pool {key}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::ReleaseOutcome;

    #[test]
    fn test_membership_holds_across_mixed_operations() {
        let mut scene = Scene::new();
        let manifest = PoolManifest::from_toml_str(
            r#"
            [[pools]]
            template = "bullet"
            count = 3
            prewarm = "immediate"

            [[pools]]
            template = "explosion"
            count = 2
            key = "boom"
            prewarm = "immediate"
            "#,
        )
        .expect("Should parse");
        let descriptors = manifest.resolve(&catalog()).expect("Should resolve");
        let mut pool = ObjectPool::with_settings(&mut scene, manifest.settings.clone(), descriptors);

        let stray = scene.create_node("Stray", None);
        let mut checked_out: Vec<NodeId> = Vec::new();
        let mut seen: Vec<NodeId> = Vec::new();

        // Small LCG so the sequence is deterministic but not trivially regular.
        let mut state: u32 = 7;
        for _ in 0..200 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            match (state >> 16) % 5 {
                0 => {
                    let bullet = pool.get::<Bullet>(&mut scene).expect("Should check out");
                    checked_out.push(bullet.instance());
                }
                1 => {
                    let boom = pool.get_keyed::<Explosion>(&mut scene, "boom").expect("Should check out");
                    checked_out.push(boom.instance());
                }
                2 if !checked_out.is_empty() => {
                    let index = (state as usize) % checked_out.len();
                    let instance = checked_out.swap_remove(index);
                    assert!(pool.release(&mut scene, instance).is_returned());
                    // A second return of the same instance is absorbed.
                    assert_eq!(pool.release(&mut scene, instance), ReleaseOutcome::Unregistered);
                }
                3 => {
                    assert_eq!(pool.release(&mut scene, stray), ReleaseOutcome::Unregistered);
                }
                _ => {
                    assert!(pool.get_keyed::<Bullet>(&mut scene, "boom").is_err());
                }
            }

            for &instance in &checked_out {
                if !seen.contains(&instance) {
                    seen.push(instance);
                }
            }
            assert_membership(&pool, &seen);
        }

        for instance in checked_out.drain(..) {
            assert!(pool.release(&mut scene, instance).is_returned());
            assert!(!scene.is_enabled(instance));
        }
        assert_membership(&pool, &seen);
        assert_eq!(pool.active_count(&PoolKey::of::<Bullet>()), Ok(0));
        assert_eq!(pool.active_count(&PoolKey::named("boom")), Ok(0));
    }

    #[test]
    fn test_get_then_release_restores_inactive_size() {
        let mut scene = Scene::new();
        let manifest = PoolManifest::from_toml_str(
            r#"
            [[pools]]
            template = "asteroid"
            count = 4
            prewarm = "immediate"
            "#,
        )
        .expect("Should parse");
        let descriptors = manifest.resolve(&catalog()).expect("Should resolve");
        let mut pool = ObjectPool::initialize(&mut scene, descriptors);
        let key = PoolKey::of::<Asteroid>();

        for _ in 0..10 {
            let before = pool.inactive_count(&key).expect("Should exist");
            let asteroid = pool.get::<Asteroid>(&mut scene).expect("Should check out");
            pool.release_pooled(&mut scene, asteroid);
            assert_eq!(pool.inactive_count(&key), Ok(before));
        }
        assert_eq!(scene.instantiate_count(), 4);
    }

    #[test]
    fn test_unregistered_key_always_fails() {
        let mut scene = Scene::new();
        let descriptors = PoolManifest::from_toml_str(
            r#"
            [[pools]]
            template = "bullet"
            count = 1
            "#,
        )
        .expect("Should parse")
        .resolve(&catalog())
        .expect("Should resolve");
        let mut pool = ObjectPool::initialize(&mut scene, descriptors);

        for _ in 0..3 {
            assert!(matches!(pool.get::<Asteroid>(&mut scene), Err(PoolError::PoolNotFound { .. })));
            assert!(matches!(
                pool.get_keyed::<Bullet>(&mut scene, "bullet"),
                Err(PoolError::PoolNotFound { .. })
            ));
            pool.prewarm_tick(&mut scene);
            pool.get::<Bullet>(&mut scene).expect("Should check out");
        }
    }

    #[test]
    fn test_incremental_manifest_prewarms_over_ticks() {
        let mut scene = Scene::new();
        let manifest = PoolManifest::from_toml_str(
            r#"
            [settings]
            root_name = "Arcade"

            [[pools]]
            template = "explosion"
            count = 5
            key = "boom"

            [[pools]]
            template = "explosion"
            count = 9
            key = "boom"
            "#,
        )
        .expect("Should parse");
        let descriptors = manifest.resolve(&catalog()).expect("Should resolve");
        let mut pool = ObjectPool::with_settings(&mut scene, manifest.settings.clone(), descriptors);
        let key = PoolKey::named("boom");

        assert_eq!(scene.name_of(pool.root()), Some("Arcade"));
        assert_eq!(pool.diagnostics().len(), 1);
        assert_eq!(pool.inactive_count(&key), Ok(0));

        let mut ticks = 0;
        while pool.is_prewarming() {
            pool.prewarm_tick(&mut scene);
            ticks += 1;
        }
        assert_eq!(ticks, 5);
        assert_eq!(pool.inactive_count(&key), Ok(5));

        let container = pool.container(&key).expect("Should exist");
        assert_eq!(scene.children(container).count(), 5);
    }
}
