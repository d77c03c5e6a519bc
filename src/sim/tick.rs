//! Per-frame simulation tick
//!
//! One call = one display refresh: step the particles, feed the metric to the
//! settle detector, advance the frame counter.

use super::kinematics;
use super::settle::RevealEvent;
use super::state::FieldState;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Index of the frame just simulated (0-based)
    pub frame: u64,
    /// Mean |vx| after this frame's decay
    pub metric: f32,
    /// Label opacity after this frame
    pub opacity: f32,
    pub event: Option<RevealEvent>,
}

/// Advance the field by one frame
pub fn tick(state: &mut FieldState) -> FrameReport {
    let frame = state.frame;
    let metric = kinematics::step(&mut state.particles, &state.config);
    let event = state.settle.observe(metric, frame);

    state.last_metric = metric;
    state.frame += 1;

    match event {
        Some(RevealEvent::Settled) => {
            log::info!("Field settled at frame {} (mean |vx| = {:.3})", frame, metric);
        }
        Some(RevealEvent::FullyRevealed) => {
            log::info!("Label fully revealed at frame {}", frame);
        }
        None => {
            log::trace!(
                "frame {}: metric {:.3}, opacity {:.3}",
                frame,
                metric,
                state.settle.opacity()
            );
        }
    }

    FrameReport {
        frame,
        metric,
        opacity: state.settle.opacity(),
        event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::sim::{ParticleStore, RevealPhase};
    use glam::Vec3;

    /// Tick until the field settles, returning the settle frame
    fn run_until_settled(state: &mut FieldState, max_frames: u64) -> Option<u64> {
        for _ in 0..max_frames {
            let report = tick(state);
            if report.event == Some(RevealEvent::Settled) {
                return Some(report.frame);
            }
        }
        None
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut state = FieldState::new(1);
        let first = tick(&mut state);
        let second = tick(&mut state);
        assert_eq!(first.frame, 0);
        assert_eq!(second.frame, 1);
        assert_eq!(state.frame, 2);
        assert_eq!(state.last_metric, second.metric);
    }

    #[test]
    fn test_default_field_settles_after_several_hundred_frames() {
        let mut state = FieldState::new(12345);
        let start = tick(&mut state).metric;
        assert!(start > 2.3 * 10.0, "starting metric {}", start);

        // 75 * 0.991^t < 2.3  =>  t ~ 385
        let settled = run_until_settled(&mut state, 2000).expect("field never settled");
        assert!((350..=420).contains(&settled), "settled at {}", settled);
        assert!(state.last_metric < 2.3);
    }

    #[test]
    fn test_single_particle_settle_frame() {
        // 100 * 0.991^t < 2.3  =>  t > 417.2, so the 418th tick (frame index 417)
        let store = ParticleStore::from_particles(&[(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0))]);
        let mut state = FieldState::from_store(0, store, FieldConfig::default());
        let settled = run_until_settled(&mut state, 1000);
        assert_eq!(settled, Some(417));
    }

    #[test]
    fn test_opacity_reaches_one_and_stays() {
        let store = ParticleStore::from_particles(&[(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0))]);
        let mut state = FieldState::from_store(0, store, FieldConfig::default());

        // Already below threshold: reveal starts on frame 0
        let first = tick(&mut state);
        assert_eq!(first.event, Some(RevealEvent::Settled));

        let mut previous = first.opacity;
        for _ in 1..334 {
            let report = tick(&mut state);
            assert!(report.opacity >= previous);
            previous = report.opacity;
        }
        assert_eq!(state.label_opacity(), 1.0);

        for _ in 0..100 {
            assert_eq!(tick(&mut state).opacity, 1.0);
        }
        assert_eq!(
            state.settle.phase(),
            RevealPhase::Revealing {
                settled_at_frame: 0
            }
        );
    }

    #[test]
    fn test_determinism() {
        let mut a = FieldState::new(2024);
        let mut b = FieldState::new(2024);
        for _ in 0..200 {
            assert_eq!(tick(&mut a), tick(&mut b));
        }
        assert_eq!(a.particles.positions(), b.particles.positions());
    }
}
