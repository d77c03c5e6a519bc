//! Perspective camera and picking rays

use glam::{Mat4, Vec2, Vec3};

use crate::consts::*;

/// A half-line used for picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Right-handed perspective camera looking at a target, +Y up
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    /// Scene camera: 35° fov, pulled back along +Z, looking at the origin
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: CAMERA_FOV_DEG.to_radians(),
            aspect: sanitize_aspect(aspect),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            target: Vec3::ZERO,
        }
    }

    /// Update aspect after a viewport resize
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Projection with wgpu's 0..1 depth range
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unit vector from the camera toward its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// Camera-space +X in world space
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    /// Camera-space +Y in world space
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// World point -> NDC (x, y in -1..1 when on screen)
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection().project_point3(point)
    }

    /// Ray from the eye through a point given in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let half_height = (self.fov_y * 0.5).tan();
        let direction = self.forward()
            + self.right() * (ndc.x * half_height * self.aspect)
            + self.up() * (ndc.y * half_height);
        Ray {
            origin: self.position,
            direction: direction.normalize_or(self.forward()),
        }
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = PerspectiveCamera::new(16.0 / 9.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 1200.0));
        assert!((camera.fov_y - 35.0_f32.to_radians()).abs() < 1e-6);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.right() - Vec3::X).length() < 1e-5);
        assert!((camera.up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = PerspectiveCamera::new(1.5);
        let ndc = camera.project(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = PerspectiveCamera::new(1.0);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_ray_hits_projected_point() {
        let camera = PerspectiveCamera::new(4.0 / 3.0);
        let point = Vec3::new(120.0, -40.0, 30.0);
        let ndc = camera.project(point);
        let ray = camera.ray_from_ndc(ndc.truncate());

        // The ray passes through the point it was cast at
        let t = (point - ray.origin).dot(ray.direction);
        assert!((ray.at(t) - point).length() < 0.05);
    }

    #[test]
    fn test_bad_aspect_is_ignored() {
        let mut camera = PerspectiveCamera::new(0.0);
        assert_eq!(camera.aspect, 1.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 1.0);
        camera.set_aspect(2.0);
        assert_eq!(camera.aspect, 2.0);
    }
}
