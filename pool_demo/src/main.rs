//! Pool demo application
//!
//! Simulates an arcade shooter's spawn traffic against recycling pools:
//! bullets and asteroids come and go every frame while incremental pools
//! finish prewarming in the background.
//!
//! Usage: `pool_demo [manifest.toml|manifest.ron] [--cancel-prewarm-at FRAME]`

use prefab_pool::logging;
use prefab_pool::prelude::*;
use rand::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

// Simulation constants
const FRAMES: usize = 240;
const FIRE_CHANCE: f64 = 0.6;
const RETIRE_CHANCE: f64 = 0.35;
const EXPLOSION_CHANCE: f64 = 0.1;

const DEFAULT_MANIFEST: &str = r#"
[settings]
root_name = "Arcade"
log_level = "info"

[[pools]]
template = "bullet"
count = 32
prewarm = "immediate"

[[pools]]
template = "asteroid"
count = 12

[[pools]]
template = "small_explosion"
count = 6
key = "explosion.small"

[[pools]]
template = "large_explosion"
count = 2
key = "explosion.large"
prewarm = "immediate"
"#;

struct Bullet;
struct Asteroid;
struct Explosion;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

struct DemoArgs {
    manifest_path: Option<String>,
    cancel_prewarm_at: Option<usize>,
}

impl DemoArgs {
    fn parse() -> Result<Self, DemoError> {
        let mut args = std::env::args().skip(1);
        let mut parsed = Self {
            manifest_path: None,
            cancel_prewarm_at: None,
        };

        while let Some(arg) = args.next() {
            if arg == "--cancel-prewarm-at" {
                let frame = args
                    .next()
                    .ok_or_else(|| DemoError::Argument("--cancel-prewarm-at needs a frame number".to_string()))?;
                let frame = frame
                    .parse()
                    .map_err(|_| DemoError::Argument(format!("'{frame}' is not a frame number")))?;
                parsed.cancel_prewarm_at = Some(frame);
            } else {
                parsed.manifest_path = Some(arg);
            }
        }

        Ok(parsed)
    }
}

fn prefab_catalog() -> HashMap<String, Prefab> {
    let mut catalog = HashMap::new();
    catalog.insert("bullet".to_string(), Prefab::new::<Bullet>("Bullet"));
    catalog.insert("asteroid".to_string(), Prefab::new::<Asteroid>("Asteroid"));
    catalog.insert("small_explosion".to_string(), Prefab::new::<Explosion>("SmallExplosion"));
    catalog.insert("large_explosion".to_string(), Prefab::new::<Explosion>("LargeExplosion"));
    catalog
}

struct ArcadeSim {
    scene: Scene,
    pool: ObjectPool<Scene>,
    live: Vec<NodeId>,
    rng: StdRng,
}

impl ArcadeSim {
    fn new(manifest: &PoolManifest) -> Result<Self, DemoError> {
        let descriptors = manifest.resolve(&prefab_catalog())?;
        let mut scene = Scene::new();
        let pool = ObjectPool::with_settings(&mut scene, manifest.settings.clone(), descriptors);

        for diagnostic in pool.diagnostics() {
            log::warn!("Manifest problem: {}", diagnostic);
        }

        Ok(Self {
            scene,
            pool,
            live: Vec::new(),
            rng: StdRng::seed_from_u64(0x5eed),
        })
    }

    fn frame(&mut self) -> Result<(), DemoError> {
        self.pool.prewarm_tick(&mut self.scene);

        if self.rng.gen_bool(FIRE_CHANCE) {
            let bullet = self.pool.get::<Bullet>(&mut self.scene)?;
            self.live.push(bullet.instance());
        }

        if self.rng.gen_bool(FIRE_CHANCE / 3.0) {
            let asteroid = self.pool.get::<Asteroid>(&mut self.scene)?;
            self.live.push(asteroid.instance());
        }

        if self.rng.gen_bool(EXPLOSION_CHANCE) {
            let key = if self.rng.gen_bool(0.8) { "explosion.small" } else { "explosion.large" };
            let explosion = self.pool.get_keyed::<Explosion>(&mut self.scene, key)?;
            self.live.push(explosion.instance());
        }

        if !self.live.is_empty() && self.rng.gen_bool(RETIRE_CHANCE) {
            let index = self.rng.gen_range(0..self.live.len());
            let instance = self.live.swap_remove(index);
            self.pool.release(&mut self.scene, instance);
        }

        Ok(())
    }

    fn report(&self) {
        let mut keys: Vec<&PoolKey> = self.pool.pool_keys().collect();
        keys.sort_by_key(|key| key.to_string());

        for key in keys {
            if let Ok(stats) = self.pool.stats(key) {
                log::info!(
                    "{:<20} constructed {:>3} (lazy {:>3})  gets {:>4}  returns {:>4}  active {:>3}  peak {:>3}",
                    key.to_string(),
                    stats.constructed,
                    stats.constructed_lazily,
                    stats.gets,
                    stats.returns,
                    stats.active,
                    stats.peak_active
                );
            }
        }
        log::info!("Scene holds {} nodes", self.scene.len());
    }
}

fn run() -> Result<(), DemoError> {
    let args = DemoArgs::parse()?;
    let manifest = match &args.manifest_path {
        Some(path) => PoolManifest::load_from_file(path)?,
        None => PoolManifest::from_toml_str(DEFAULT_MANIFEST)?,
    };

    if logging::init_with_level(&manifest.settings.log_level).is_err() {
        eprintln!("warning: logger already initialized");
    }
    log::info!("Starting pool demo with {} pool entries", manifest.pools.len());

    let mut sim = ArcadeSim::new(&manifest)?;
    for frame in 0..FRAMES {
        if args.cancel_prewarm_at == Some(frame) {
            let skipped = sim.pool.cancel_prewarm();
            log::info!("Frame {}: cancelled prewarm, {} instances left to lazy construction", frame, skipped);
        }
        sim.frame()?;
    }

    sim.report();
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("pool_demo: {err}");
        std::process::exit(1);
    }
}
