//! Stillness - a particle burst that settles and reveals a linked label
//!
//! Core modules:
//! - `sim`: Particle store, kinematics and settle detection (pure, seeded)
//! - `scene`: Camera, orbit controls and the label sprite hit-test
//! - `driver`: Per-frame driver with a stop handle
//! - `renderer`: WebGPU points + sprite pipeline
//! - `platform`: Browser bootstrap and native headless embedding

pub mod config;
pub mod driver;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod sim;

pub use config::FieldConfig;
pub use driver::{FrameDriver, FrameOutcome, FrameView, Navigator, Presenter, StopHandle};

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Number of particles in the field
    pub const PARTICLE_COUNT: usize = 600;
    /// Half-width of the cube initial positions are drawn from
    pub const POSITION_EXTENT: f32 = 100.0;
    /// Half-width of the cube initial velocities are drawn from
    pub const VELOCITY_EXTENT: f32 = 150.0;

    /// Per-axis position step applied to velocity each frame (x spreads faster)
    pub const STEP_SCALE: [f32; 3] = [0.05, 0.02, 0.02];
    /// Multiplicative per-frame velocity decay
    pub const VELOCITY_DECAY: f32 = 0.991;

    /// Mean |vx| below which the field counts as settled
    pub const SETTLE_THRESHOLD: f32 = 2.3;
    /// Label opacity gained per frame once settled
    pub const FADE_STEP: f32 = 0.003;

    /// Camera
    pub const CAMERA_FOV_DEG: f32 = 35.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 4000.0;
    pub const CAMERA_DISTANCE: f32 = 1200.0;

    /// Orbit controls
    pub const ORBIT_DAMPING: f32 = 0.05;
    pub const ORBIT_ROTATE_SPEED: f32 = 1.0;
    pub const ORBIT_ZOOM_SPEED: f32 = 1.0;

    /// Points material
    pub const POINT_SIZE: f32 = 3.0;
    /// Upper bound on device pixel ratio used for the drawing buffer
    pub const MAX_PIXEL_RATIO: f64 = 2.0;

    /// Label text and typography
    pub const LABEL_TEXT: &str = "For a moment, we were able to be still";
    pub const LABEL_FONT_FAMILY: &str = "Darker Grotesque";
    pub const LABEL_FONT_WEIGHT: u32 = 300;
    pub const LABEL_FONT_SIZE: u32 = 200;
    /// Padding around the text on the label canvas (pixels, each side)
    pub const LABEL_PADDING: u32 = 20;
    /// World units per label canvas pixel
    pub const LABEL_WORLD_SCALE: f32 = 0.15;

    /// Where a click on the label goes
    pub const LINK_URL: &str = "https://www.youtube.com/watch?v=AexrAvyJjJY";
    pub const LINK_TARGET: &str = "_blank";
}

/// Map window pixel coordinates to normalized device coordinates.
///
/// `x` grows right and `y` grows down in window space; NDC has +y up.
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        let top_left = pixel_to_ndc(0.0, 0.0, 800.0, 600.0);
        assert_eq!(top_left, Vec2::new(-1.0, 1.0));

        let bottom_right = pixel_to_ndc(800.0, 600.0, 800.0, 600.0);
        assert_eq!(bottom_right, Vec2::new(1.0, -1.0));

        let center = pixel_to_ndc(400.0, 300.0, 800.0, 600.0);
        assert!(center.length() < 1e-6);
    }
}
