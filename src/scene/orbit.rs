//! Orbit controls with damping
//!
//! Pointer drags queue a rotation around the target; `update` applies a fraction
//! of the queued rotation each frame and decays the rest, so the camera eases to
//! a stop after the pointer is released. Wheel steps dolly in and out.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::camera::PerspectiveCamera;
use crate::consts::*;

/// Keeps the polar angle off the poles so `look_at` stays defined
const POLAR_EPSILON: f32 = 1e-6;

/// Spherical coordinates around +Y (theta from +Z toward +X, phi from +Y)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Damped orbit controls for a [`PerspectiveCamera`]
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    /// Fraction of the pending rotation applied per update (0 disables damping)
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending rotation (theta, phi)
    pending: Vec2,
    /// Pending dolly factor, applied in full on the next update
    scale: f32,
    /// Last pointer position while dragging
    drag_from: Option<Vec2>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            damping: ORBIT_DAMPING,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_speed: ORBIT_ZOOM_SPEED,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            pending: Vec2::ZERO,
            scale: 1.0,
            drag_from: None,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Queue a rotation about the vertical axis
    pub fn rotate_left(&mut self, angle: f32) {
        self.pending.x -= angle;
    }

    /// Queue a rotation toward the pole
    pub fn rotate_up(&mut self, angle: f32) {
        self.pending.y -= angle;
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag_from = Some(Vec2::new(x, y));
    }

    /// Pointer moved; rotates only while dragging. A drag the full height of the
    /// element turns the camera once around.
    pub fn pointer_move(&mut self, x: f32, y: f32, element_height: f32) {
        let Some(from) = self.drag_from else {
            return;
        };
        let to = Vec2::new(x, y);
        if element_height > 0.0 {
            let delta = (to - from) * self.rotate_speed;
            self.rotate_left(TAU * delta.x / element_height);
            self.rotate_up(TAU * delta.y / element_height);
        }
        self.drag_from = Some(to);
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Wheel step: negative `delta_y` (scroll up) moves closer
    pub fn wheel(&mut self, delta_y: f32) {
        let step = 0.95_f32.powf(self.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else if delta_y > 0.0 {
            self.scale /= step;
        }
    }

    /// Apply pending motion to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        let applied = if self.damping > 0.0 {
            self.pending * self.damping
        } else {
            self.pending
        };
        spherical.theta += applied.x;
        spherical.phi = (spherical.phi + applied.y).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let previous = camera.position;
        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.damping > 0.0 {
            self.pending *= 1.0 - self.damping;
        } else {
            self.pending = Vec2::ZERO;
        }
        self.scale = 1.0;

        previous.distance_squared(camera.position) > 1e-6
    }
}
