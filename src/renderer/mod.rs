//! WebGPU rendering module
//!
//! Instanced point quads for the particles plus one billboard for the label.

pub mod error;
pub mod pipeline;
pub mod vertex;

pub use error::GpuError;
pub use pipeline::SceneRenderState;
