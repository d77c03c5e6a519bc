//! Particle store
//!
//! Positions and velocities live in two flat `f32` buffers, three components per
//! particle, so the position buffer can be handed to the GPU as-is.

use std::fmt;

use glam::Vec3;
use rand::Rng;

/// Errors building a store from explicit buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Position and velocity buffers differ in length
    LengthMismatch { positions: usize, velocities: usize },
    /// Buffer length is not a multiple of 3
    NotVec3 { len: usize },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LengthMismatch {
                positions,
                velocities,
            } => write!(
                f,
                "position buffer has {} floats but velocity buffer has {}",
                positions, velocities
            ),
            StoreError::NotVec3 { len } => {
                write!(f, "buffer length {} is not a multiple of 3", len)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Fixed-size particle collection
#[derive(Debug, Clone)]
pub struct ParticleStore {
    positions: Vec<f32>,
    velocities: Vec<f32>,
    /// Positions changed since the renderer last uploaded them
    positions_dirty: bool,
}

impl ParticleStore {
    /// Fill `count` particles with uniform draws in `[-extent, extent)` per axis.
    ///
    /// Position and velocity draws are interleaved per component, so a given RNG
    /// stream always yields the same field.
    pub fn random<R: Rng>(
        count: usize,
        position_extent: f32,
        velocity_extent: f32,
        rng: &mut R,
    ) -> Self {
        let len = count * 3;
        let mut positions = Vec::with_capacity(len);
        let mut velocities = Vec::with_capacity(len);
        for _ in 0..len {
            positions.push((rng.random::<f32>() - 0.5) * 2.0 * position_extent);
            velocities.push((rng.random::<f32>() - 0.5) * 2.0 * velocity_extent);
        }
        Self {
            positions,
            velocities,
            positions_dirty: true,
        }
    }

    /// Build a store from explicit flat buffers
    pub fn from_buffers(positions: Vec<f32>, velocities: Vec<f32>) -> Result<Self, StoreError> {
        if positions.len() != velocities.len() {
            return Err(StoreError::LengthMismatch {
                positions: positions.len(),
                velocities: velocities.len(),
            });
        }
        if positions.len() % 3 != 0 {
            return Err(StoreError::NotVec3 {
                len: positions.len(),
            });
        }
        Ok(Self {
            positions,
            velocities,
            positions_dirty: true,
        })
    }

    /// Build a store from per-particle vectors
    pub fn from_particles(particles: &[(Vec3, Vec3)]) -> Self {
        let mut positions = Vec::with_capacity(particles.len() * 3);
        let mut velocities = Vec::with_capacity(particles.len() * 3);
        for (pos, vel) in particles {
            positions.extend_from_slice(&pos.to_array());
            velocities.extend_from_slice(&vel.to_array());
        }
        Self {
            positions,
            velocities,
            positions_dirty: true,
        }
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat position buffer (x, y, z per particle)
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat velocity buffer (vx, vy, vz per particle)
    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    pub fn velocity(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.velocities[index * 3..index * 3 + 3])
    }

    /// Both buffers, mutably, for the stepper
    pub(crate) fn buffers_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.positions, &mut self.velocities)
    }

    /// Flag the position buffer for re-upload
    pub fn mark_positions_dirty(&mut self) {
        self.positions_dirty = true;
    }

    /// Whether the renderer needs to re-upload positions
    pub fn positions_dirty(&self) -> bool {
        self.positions_dirty
    }

    /// Called once the renderer has consumed the current positions
    pub fn mark_positions_uploaded(&mut self) {
        self.positions_dirty = false;
    }
}
