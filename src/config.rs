//! Simulation configuration
//!
//! The defaults are the hardcoded scene constants. The struct exists so tests and
//! embeddings can build smaller fields, and so the effective values can be logged.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunables for the particle field and label reveal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Number of particles
    pub particle_count: usize,
    /// Initial positions are uniform in `[-extent, extent]` per axis
    pub position_extent: f32,
    /// Initial velocities are uniform in `[-extent, extent]` per axis
    pub velocity_extent: f32,

    // === Kinematics ===
    /// Per-axis scale applied to velocity when advancing position
    pub step_scale: [f32; 3],
    /// Velocity multiplier per frame (must be < 1)
    pub decay: f32,

    // === Reveal ===
    /// Metric below which the label starts fading in
    pub settle_threshold: f32,
    /// Opacity gained per frame while revealing
    pub fade_step: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            position_extent: POSITION_EXTENT,
            velocity_extent: VELOCITY_EXTENT,

            step_scale: STEP_SCALE,
            decay: VELOCITY_DECAY,

            settle_threshold: SETTLE_THRESHOLD,
            fade_step: FADE_STEP,
        }
    }
}

impl FieldConfig {
    /// Config with a different particle count, everything else default
    pub fn with_particle_count(particle_count: usize) -> Self {
        Self {
            particle_count,
            ..Self::default()
        }
    }

    /// Frames until a velocity component decays by `ratio` (e.g. 0.5 for a half-life)
    pub fn frames_to_decay(&self, ratio: f32) -> u32 {
        (ratio.ln() / self.decay.ln()).ceil() as u32
    }

    /// Frames from the start of the reveal until the label is fully opaque
    pub fn frames_to_full_reveal(&self) -> u32 {
        (1.0 / self.fade_step).ceil() as u32
    }

    /// One-line JSON summary for startup logging
    pub fn to_log_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("<unserializable config: {e}>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count, 600);
        assert_eq!(config.step_scale, [0.05, 0.02, 0.02]);
        assert!((config.decay - 0.991).abs() < f32::EPSILON);
        assert!((config.settle_threshold - 2.3).abs() < f32::EPSILON);
        assert!((config.fade_step - 0.003).abs() < f32::EPSILON);
    }

    #[test]
    fn test_full_reveal_frames() {
        // 1.0 / 0.003 = 333.33, so the 334th frame reaches full opacity
        assert_eq!(FieldConfig::default().frames_to_full_reveal(), 334);
    }

    #[test]
    fn test_half_life() {
        // 0.991^77 ~= 0.498
        assert_eq!(FieldConfig::default().frames_to_decay(0.5), 77);
    }

    #[test]
    fn test_log_string_round_trips() {
        let config = FieldConfig::with_particle_count(12);
        let json = config.to_log_string();
        let parsed: FieldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
