//! Scene: camera, orbit controls and the label sprite
//!
//! Geometry only; nothing in here touches the GPU or the DOM.

pub mod camera;
pub mod label;
pub mod orbit;

pub use camera::{PerspectiveCamera, Ray};
pub use label::{LabelBitmap, LabelLayout, LabelSprite, font_load_query, label_font};
pub use orbit::OrbitControls;
