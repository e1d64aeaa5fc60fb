//! Unit tests for hive-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, BoidId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering_and_next() {
        assert!(BoidId(0) < BoidId(1));
        assert_eq!(BoidId(4).next(), BoidId(5));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(BoidId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod vec3 {
    use crate::Vec3;

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn normalize_has_unit_length() {
        let v = Vec3::new(3.0, -4.0, 12.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn clamp_length_only_shrinks() {
        let long = Vec3::new(10.0, 0.0, 0.0).clamp_length(2.0);
        assert!((long.length() - 2.0).abs() < 1e-6);
        let short = Vec3::new(0.5, 0.0, 0.0).clamp_length(2.0);
        assert_eq!(short, Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(b), 32.0);
        assert!(a.lerp(b, 0.5).approx_eq(Vec3::new(2.5, 3.5, 4.5), 1e-6));
    }

    #[test]
    fn sum_of_iter() {
        let total: Vec3 = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)]
            .into_iter()
            .sum();
        assert_eq!(total, Vec3::new(1.0, 1.0, 0.0));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(Tick::ZERO + 1, Tick(1));
        assert_eq!(Tick(3).to_string(), "T3");
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(0.5);
        assert_eq!(clock.elapsed_secs(), 0.0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(1.0 / 60.0);
        assert_eq!(clock.ticks_for_secs(1.0), 60);
        assert_eq!(clock.ticks_for_secs(0.001), 1);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, BoidId, SimRng};

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::for_boid(7, BoidId(3));
        let mut b = AgentRng::for_boid(7, BoidId(3));
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn different_ids_diverge() {
        let mut a = AgentRng::for_agent(7, AgentId(0));
        let mut b = AgentRng::for_agent(7, AgentId(1));
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn centered_is_in_range() {
        let mut r = AgentRng::for_boid(1, BoidId(0));
        for _ in 0..1000 {
            let v = r.centered();
            assert!((-0.5..0.5).contains(&v));
        }
    }

    #[test]
    fn sim_rng_child_is_deterministic() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        let mut ca = a.child(1);
        let mut cb = b.child(1);
        assert_eq!(ca.random::<u32>(), cb.random::<u32>());
        let x: f32 = a.gen_range(-1.0..1.0);
        assert!((-1.0..1.0).contains(&x));
    }
}
