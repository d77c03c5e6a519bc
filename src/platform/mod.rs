//! Platform layer
//!
//! - `web`: browser bootstrap pieces (DOM, fonts, label rasterization, links)
//! - `headless`: no-op presenter and recording navigator for native runs

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;
