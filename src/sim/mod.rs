//! Deterministic simulation module
//!
//! The whole animated core lives here. This module must stay pure:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod kinematics;
pub mod particles;
pub mod settle;
pub mod state;
pub mod tick;

pub use kinematics::{motion_metric, step};
pub use particles::{ParticleStore, StoreError};
pub use settle::{RevealEvent, RevealPhase, SettleDetector};
pub use state::FieldState;
pub use tick::{FrameReport, tick};
