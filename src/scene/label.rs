//! Text label: canvas layout, the camera-facing sprite, and its hit-test
//!
//! The label is rasterized once on a 2D canvas (see `platform::web`), then drawn
//! as a quad that always faces the camera. Its world size is the canvas size
//! times `LABEL_WORLD_SCALE`, so a wider text gives a wider sprite.

use glam::{Vec2, Vec3};

use super::camera::{PerspectiveCamera, Ray};
use crate::consts::*;

/// CSS font shorthand used to draw the label
pub fn label_font() -> String {
    format!(
        "{} {}px \"{}\"",
        LABEL_FONT_WEIGHT, LABEL_FONT_SIZE, LABEL_FONT_FAMILY
    )
}

/// Query passed to `document.fonts.load` before the label is drawn
pub fn font_load_query() -> String {
    format!("{} 1em \"{}\"", LABEL_FONT_WEIGHT, LABEL_FONT_FAMILY)
}

/// Pixel layout of the label canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    /// Measured advance width of the text in pixels
    pub text_width: f32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Where `fillText` starts (left edge, alphabetic baseline)
    pub text_origin: Vec2,
}

impl LabelLayout {
    /// Layout around a measured text width.
    ///
    /// Canvas dimensions are integers, so the padded width is truncated the way
    /// assigning a fractional `canvas.width` does.
    pub fn from_text_width(text_width: f32) -> Self {
        let padded = text_width.max(0.0) + (2 * LABEL_PADDING) as f32;
        Self {
            text_width,
            canvas_width: (padded as u32).max(1),
            canvas_height: LABEL_FONT_SIZE + 2 * LABEL_PADDING,
            text_origin: Vec2::new(LABEL_PADDING as f32, (LABEL_FONT_SIZE + 1) as f32),
        }
    }

    /// Rough layout when no canvas is available to measure with
    pub fn approximate(text: &str) -> Self {
        // Darker Grotesque light averages a little under 0.4em per glyph
        let width = text.chars().count() as f32 * LABEL_FONT_SIZE as f32 * 0.38;
        Self::from_text_width(width)
    }

    /// Sprite size in world units
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width as f32, self.canvas_height as f32) * LABEL_WORLD_SCALE
    }
}

/// Rasterized label pixels, straight (non-premultiplied) RGBA8, rows top-down
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl LabelBitmap {
    /// Wrap raw pixels; `None` if the buffer size does not match
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || rgba.len() != (width * height * 4) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Box-filtered copy whose longer side is at most `max_dim` pixels.
    ///
    /// Averages in premultiplied alpha so the white glyph edges stay white.
    pub fn fit_within(&self, max_dim: u32) -> LabelBitmap {
        let max_dim = max_dim.max(1);
        let longest = self.width.max(self.height);
        if longest <= max_dim {
            return self.clone();
        }

        let shrink = |side: u32| ((side as u64 * max_dim as u64 / longest as u64) as u32).max(1);
        let width = shrink(self.width);
        let height = shrink(self.height);
        let mut rgba = vec![0u8; (width * height * 4) as usize];

        for dy in 0..height {
            let y0 = (dy as u64 * self.height as u64 / height as u64) as u32;
            let y1 = (((dy + 1) as u64 * self.height as u64).div_ceil(height as u64) as u32).max(y0 + 1);
            for dx in 0..width {
                let x0 = (dx as u64 * self.width as u64 / width as u64) as u32;
                let x1 = (((dx + 1) as u64 * self.width as u64).div_ceil(width as u64) as u32).max(x0 + 1);

                let mut sum = [0.0f64; 4];
                let mut count = 0.0;
                for y in y0..y1.min(self.height) {
                    for x in x0..x1.min(self.width) {
                        let i = ((y * self.width + x) * 4) as usize;
                        let a = self.rgba[i + 3] as f64 / 255.0;
                        sum[0] += self.rgba[i] as f64 * a;
                        sum[1] += self.rgba[i + 1] as f64 * a;
                        sum[2] += self.rgba[i + 2] as f64 * a;
                        sum[3] += a;
                        count += 1.0;
                    }
                }

                let o = ((dy * width + dx) * 4) as usize;
                let alpha = sum[3] / count;
                if sum[3] > 0.0 {
                    for c in 0..3 {
                        rgba[o + c] = (sum[c] / sum[3]).round().clamp(0.0, 255.0) as u8;
                    }
                }
                rgba[o + 3] = (alpha * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }

        LabelBitmap {
            width,
            height,
            rgba,
        }
    }
}

/// Camera-facing label quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSprite {
    pub center: Vec3,
    /// Full width and height in world units
    pub size: Vec2,
}

impl LabelSprite {
    /// Sprite centered at the origin, sized from the canvas layout
    pub fn from_layout(layout: &LabelLayout) -> Self {
        Self {
            center: Vec3::ZERO,
            size: layout.world_size(),
        }
    }

    /// Corners in world space as seen from `camera`
    /// (bottom-left, bottom-right, top-right, top-left)
    pub fn corners(&self, camera: &PerspectiveCamera) -> [Vec3; 4] {
        let right = camera.right() * (self.size.x * 0.5);
        let up = camera.up() * (self.size.y * 0.5);
        [
            self.center - right - up,
            self.center + right - up,
            self.center + right + up,
            self.center - right + up,
        ]
    }

    /// Distance along `ray` to the quad, if the ray crosses it between the
    /// camera's near and far planes
    pub fn intersect(&self, ray: &Ray, camera: &PerspectiveCamera) -> Option<f32> {
        let normal = -camera.forward();
        let denom = ray.direction.dot(normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.center - ray.origin).dot(normal) / denom;
        if t < camera.near || t > camera.far {
            return None;
        }

        let local = ray.at(t) - self.center;
        let u = local.dot(camera.right());
        let v = local.dot(camera.up());
        let half = self.size * 0.5;
        (u.abs() <= half.x && v.abs() <= half.y).then_some(t)
    }

    /// Screen-space bounds in NDC (min, max)
    pub fn ndc_bounds(&self, camera: &PerspectiveCamera) -> (Vec2, Vec2) {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for corner in self.corners(camera) {
            let ndc = camera.project(corner).truncate();
            min = min.min(ndc);
            max = max.max(ndc);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite() -> LabelSprite {
        LabelSprite::from_layout(&LabelLayout::from_text_width(2000.0))
    }

    #[test]
    fn test_font_strings() {
        assert_eq!(label_font(), "300 200px \"Darker Grotesque\"");
        assert_eq!(font_load_query(), "300 1em \"Darker Grotesque\"");
    }

    #[test]
    fn test_layout_pads_and_truncates() {
        let layout = LabelLayout::from_text_width(1234.7);
        assert_eq!(layout.canvas_width, 1274);
        assert_eq!(layout.canvas_height, 240);
        assert_eq!(layout.text_origin, Vec2::new(20.0, 201.0));

        let size = layout.world_size();
        assert!((size.x - 1274.0 * 0.15).abs() < 1e-3);
        assert!((size.y - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_approximate_layout_is_wide() {
        let layout = LabelLayout::approximate(LABEL_TEXT);
        assert!(layout.canvas_width > layout.canvas_height * 5);
    }

    #[test]
    fn test_bitmap_size_checked() {
        assert!(LabelBitmap::new(2, 2, vec![0; 16]).is_some());
        assert!(LabelBitmap::new(2, 2, vec![0; 15]).is_none());
        assert!(LabelBitmap::new(0, 2, vec![]).is_none());
    }

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> LabelBitmap {
        let rgba = pixel.repeat((width * height) as usize);
        LabelBitmap::new(width, height, rgba).unwrap()
    }

    #[test]
    fn test_fit_within_keeps_small_bitmap() {
        let bitmap = solid(8, 4, [255, 255, 255, 255]);
        assert_eq!(bitmap.fit_within(8), bitmap);
    }

    #[test]
    fn test_fit_within_shrinks_wide_label() {
        let layout = LabelLayout::approximate(LABEL_TEXT);
        let bitmap = solid(layout.canvas_width, layout.canvas_height, [255, 255, 255, 255]);
        let fitted = bitmap.fit_within(2048);

        assert_eq!(fitted.width, 2048);
        assert!(fitted.height < layout.canvas_height);
        assert_eq!(fitted.rgba.len(), (fitted.width * fitted.height * 4) as usize);
        assert!(fitted.rgba.iter().all(|&b| b == 255));
        // Aspect ratio survives the shrink
        let before = layout.canvas_width as f32 / layout.canvas_height as f32;
        let after = fitted.width as f32 / fitted.height as f32;
        assert!((before - after).abs() / before < 0.01);
    }

    #[test]
    fn test_fit_within_keeps_edges_white() {
        // Alternating opaque white and transparent black columns
        let rgba: Vec<u8> = (0..4 * 2)
            .flat_map(|i| if i % 2 == 0 { [255, 255, 255, 255] } else { [0, 0, 0, 0] })
            .collect();
        let bitmap = LabelBitmap::new(4, 2, rgba).unwrap();
        let fitted = bitmap.fit_within(2);

        assert_eq!((fitted.width, fitted.height), (2, 1));
        for px in fitted.rgba.chunks(4) {
            assert_eq!(&px[..3], &[255, 255, 255]);
            assert!((px[3] as i32 - 128).abs() <= 1);
        }
    }

    #[test]
    fn test_center_ray_hits() {
        let camera = PerspectiveCamera::new(16.0 / 9.0);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        let t = sprite().intersect(&ray, &camera).expect("center should hit");
        assert!((t - 1200.0).abs() < 0.01);
    }

    #[test]
    fn test_hit_matches_screen_bounds() {
        let camera = PerspectiveCamera::new(16.0 / 9.0);
        let label = sprite();
        let (min, max) = label.ndc_bounds(&camera);
        assert!(min.x < 0.0 && max.x > 0.0 && min.y < 0.0 && max.y > 0.0);

        let inside = [
            Vec2::new(max.x * 0.98, 0.0),
            Vec2::new(min.x * 0.98, max.y * 0.9),
            Vec2::new(0.0, min.y * 0.9),
        ];
        for ndc in inside {
            let ray = camera.ray_from_ndc(ndc);
            assert!(label.intersect(&ray, &camera).is_some(), "expected hit at {:?}", ndc);
        }

        let outside = [
            Vec2::new(max.x * 1.02 + 0.01, 0.0),
            Vec2::new(0.0, max.y * 1.1 + 0.01),
            Vec2::new(-0.99, -0.99),
        ];
        for ndc in outside {
            let ray = camera.ray_from_ndc(ndc);
            assert!(label.intersect(&ray, &camera).is_none(), "expected miss at {:?}", ndc);
        }
    }

    #[test]
    fn test_sprite_faces_rotated_camera() {
        let mut camera = PerspectiveCamera::new(1.0);
        camera.position = Vec3::new(1200.0, 0.0, 0.0);
        let label = sprite();

        // Still hit dead center from the side: the quad turns with the camera
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert!(label.intersect(&ray, &camera).is_some());
    }

    #[test]
    fn test_behind_camera_misses() {
        let mut camera = PerspectiveCamera::new(1.0);
        let mut label = sprite();
        label.center = Vec3::new(0.0, 0.0, 1500.0);
        camera.target = Vec3::ZERO;
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert!(label.intersect(&ray, &camera).is_none());
    }
}
