//! GPU-side data layouts (must match `scene.wgsl`)

use bytemuck::{Pod, Zeroable};

use crate::driver::FrameView;

/// Per-frame uniforms shared by the points and label passes
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4], // offset 0
    pub camera_right: [f32; 4],   // offset 64
    pub camera_up: [f32; 4],      // offset 80
    pub resolution: [f32; 2],     // offset 96 - drawing buffer, physical pixels
    pub point_size: f32,          // offset 104
    pub pixel_ratio: f32,         // offset 108
    pub label_center: [f32; 3],   // offset 112 (vec3 aligned to 16)
    pub label_opacity: f32,       // offset 124 - packs into the vec3 tail
    pub label_size: [f32; 2],     // offset 128
    pub _pad: [f32; 2],           // pad to 144 bytes
}

impl Globals {
    pub fn from_view(view: &FrameView<'_>, resolution: (u32, u32), pixel_ratio: f32) -> Self {
        let camera = view.camera;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_right: camera.right().extend(0.0).to_array(),
            camera_up: camera.up().extend(0.0).to_array(),
            resolution: [resolution.0 as f32, resolution.1 as f32],
            point_size: crate::consts::POINT_SIZE,
            pixel_ratio,
            label_center: view.label.center.to_array(),
            label_opacity: view.label_opacity,
            label_size: view.label.size.to_array(),
            _pad: [0.0; 2],
        }
    }
}

/// One particle instance: its xyz straight out of the position buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
}

impl ParticleInstance {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Colors
pub mod colors {
    pub const BACKGROUND: wgpu::Color = wgpu::Color::BLACK;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<Globals>(), 144);
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 12);
    }

    #[test]
    fn test_position_buffer_casts_to_instances() {
        let positions = [1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let instances: &[ParticleInstance] = bytemuck::cast_slice(&positions);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[1].position, [4.0, 5.0, 6.0]);
    }
}
