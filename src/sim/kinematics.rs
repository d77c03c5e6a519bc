//! Kinematics stepper
//!
//! `position += velocity * step_scale`, then `velocity *= decay`. No forces, no
//! clamping: velocities approach zero geometrically, `v(t) = v(0) * decay^t`.

use super::particles::ParticleStore;
use crate::config::FieldConfig;

/// Advance every particle by one frame and return the aggregate motion metric.
///
/// Positions advance with the pre-decay velocity. The metric is the mean of
/// `|vx|` after decay; an empty store yields 0.
pub fn step(store: &mut ParticleStore, config: &FieldConfig) -> f32 {
    let [sx, sy, sz] = config.step_scale;
    let decay = config.decay;
    let count = store.len();

    let (positions, velocities) = store.buffers_mut();
    let mut sum_abs_vx = 0.0_f32;

    for (pos, vel) in positions
        .chunks_exact_mut(3)
        .zip(velocities.chunks_exact_mut(3))
    {
        pos[0] += vel[0] * sx;
        pos[1] += vel[1] * sy;
        pos[2] += vel[2] * sz;

        vel[0] *= decay;
        vel[1] *= decay;
        vel[2] *= decay;

        sum_abs_vx += vel[0].abs();
    }

    store.mark_positions_dirty();

    if count == 0 {
        0.0
    } else {
        sum_abs_vx / count as f32
    }
}

/// Mean `|vx|` of a store without stepping it
pub fn motion_metric(store: &ParticleStore) -> f32 {
    if store.is_empty() {
        return 0.0;
    }
    let sum: f32 = store
        .velocities()
        .chunks_exact(3)
        .map(|v| v[0].abs())
        .sum();
    sum / store.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    fn single(pos: Vec3, vel: Vec3) -> ParticleStore {
        ParticleStore::from_particles(&[(pos, vel)])
    }

    #[test]
    fn test_one_frame_uses_pre_decay_velocity() {
        let config = FieldConfig::default();
        let mut store = single(Vec3::new(1.0, 2.0, 3.0), Vec3::new(10.0, -20.0, 30.0));

        step(&mut store, &config);

        let pos = store.position(0);
        assert!((pos.x - (1.0 + 10.0 * 0.05)).abs() < 1e-5);
        assert!((pos.y - (2.0 - 20.0 * 0.02)).abs() < 1e-5);
        assert!((pos.z - (3.0 + 30.0 * 0.02)).abs() < 1e-5);

        let vel = store.velocity(0);
        assert!((vel - Vec3::new(9.91, -19.82, 29.73)).abs().max_element() < 1e-4);
    }

    #[test]
    fn test_single_particle_decay_scenario() {
        let config = FieldConfig::default();
        let mut store = single(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));

        let metric = step(&mut store, &config);
        assert!((store.velocity(0).x - 99.1).abs() < 1e-4);
        assert!((metric - 99.1).abs() < 1e-4);

        for _ in 1..100 {
            step(&mut store, &config);
        }
        // 100 * 0.991^100 = 40.49
        assert!((store.velocity(0).x - 40.49).abs() < 0.01);
        assert_eq!(store.velocity(0).y, 0.0);
    }

    #[test]
    fn test_metric_is_mean_abs_vx() {
        let config = FieldConfig::default();
        let mut store = ParticleStore::from_particles(&[
            (Vec3::ZERO, Vec3::new(10.0, 500.0, 0.0)),
            (Vec3::ZERO, Vec3::new(-30.0, 0.0, -500.0)),
        ]);

        let metric = step(&mut store, &config);
        // y and z never contribute
        assert!((metric - 20.0 * 0.991).abs() < 1e-4);
        assert!((motion_metric(&store) - metric).abs() < 1e-6);
    }

    #[test]
    fn test_empty_store_metric_is_zero() {
        let mut store = ParticleStore::from_particles(&[]);
        assert_eq!(step(&mut store, &FieldConfig::default()), 0.0);
        assert_eq!(motion_metric(&store), 0.0);
    }

    #[test]
    fn test_step_marks_positions_dirty() {
        let mut store = single(Vec3::ZERO, Vec3::ONE);
        store.mark_positions_uploaded();
        step(&mut store, &FieldConfig::default());
        assert!(store.positions_dirty());
    }

    proptest! {
        #[test]
        fn prop_velocity_follows_geometric_decay(
            vx in -150.0f32..150.0,
            vy in -150.0f32..150.0,
            vz in -150.0f32..150.0,
            frames in 1u32..400,
        ) {
            let config = FieldConfig::default();
            let v0 = Vec3::new(vx, vy, vz);
            let mut store = single(Vec3::ZERO, v0);
            for _ in 0..frames {
                step(&mut store, &config);
            }
            let expected = v0 * config.decay.powi(frames as i32);
            let actual = store.velocity(0);
            let tolerance = 1e-4 * v0.abs().max_element() + 1e-4;
            prop_assert!((actual - expected).abs().max_element() <= tolerance,
                "expected {:?}, got {:?}", expected, actual);
        }

        #[test]
        fn prop_speed_never_increases(
            vx in -150.0f32..150.0,
            vy in -150.0f32..150.0,
            vz in -150.0f32..150.0,
        ) {
            let config = FieldConfig::default();
            let mut store = single(Vec3::ZERO, Vec3::new(vx, vy, vz));
            let mut previous = store.velocity(0).abs();
            for _ in 0..50 {
                step(&mut store, &config);
                let current = store.velocity(0).abs();
                prop_assert!(current.cmple(previous).all());
                previous = current;
            }
        }

        #[test]
        fn prop_metric_non_increasing(seed in any::<u64>()) {
            use rand::SeedableRng;
            let config = FieldConfig::with_particle_count(32);
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let mut store = ParticleStore::random(
                config.particle_count,
                config.position_extent,
                config.velocity_extent,
                &mut rng,
            );
            let mut previous = motion_metric(&store);
            for _ in 0..100 {
                let metric = step(&mut store, &config);
                prop_assert!(metric >= 0.0);
                prop_assert!(metric <= previous);
                previous = metric;
            }
        }
    }
}
