//! Field state
//!
//! Everything the per-frame tick reads and writes lives here; the frame driver
//! owns exactly one of these.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particles::ParticleStore;
use super::settle::SettleDetector;
use crate::config::FieldConfig;

/// Complete simulation state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct FieldState {
    /// Seed the particles were drawn from
    pub seed: u64,
    pub config: FieldConfig,
    pub particles: ParticleStore,
    pub settle: SettleDetector,
    /// Frames ticked so far
    pub frame: u64,
    /// Motion metric from the most recent tick
    pub last_metric: f32,
}

impl FieldState {
    /// Default field for the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, FieldConfig::default())
    }

    pub fn with_config(seed: u64, config: FieldConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = ParticleStore::random(
            config.particle_count,
            config.position_extent,
            config.velocity_extent,
            &mut rng,
        );
        Self::from_store(seed, particles, config)
    }

    /// Wrap an existing store (the config's particle count is ignored)
    pub fn from_store(seed: u64, particles: ParticleStore, config: FieldConfig) -> Self {
        let last_metric = super::kinematics::motion_metric(&particles);
        Self {
            seed,
            settle: SettleDetector::from_config(&config),
            config,
            particles,
            frame: 0,
            last_metric,
        }
    }

    pub fn label_opacity(&self) -> f32 {
        self.settle.opacity()
    }
}
