//! Per-frame integration helpers
//!
//! Velocities in the tuned games are already scaled per fixed step, so
//! integration is `pos += vel` and the smoothing rate is a plain
//! coefficient, not multiplied by dt.

/// First-order low-pass step toward `target`
///
/// `rate` is the smoothing coefficient: 0 never moves, 1 snaps.
#[inline]
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Smooth toward `target`, then clamp into `[min, max]`
#[inline]
pub fn approach_clamped(current: f32, target: f32, rate: f32, min: f32, max: f32) -> f32 {
    approach(current, target, rate).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_approach_converges() {
        let mut v = 0.0;
        for _ in 0..200 {
            v = approach(v, 15.0, 0.15);
        }
        assert!((v - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamp_caps_target_beyond_bounds() {
        // Target outside the clamp: settles at the bound, never past it
        let mut v = 0.0;
        for _ in 0..100 {
            v = approach_clamped(v, 15.0, 0.35, -8.0, 8.0);
            assert!(v <= 8.0);
        }
        assert_eq!(v, 8.0);
    }

    proptest! {
        #[test]
        fn prop_clamped_never_exceeds_max(
            v0 in -1000.0f32..1000.0,
            target in -1000.0f32..1000.0,
            rate in 0.0f32..=1.0,
            max in 0.1f32..50.0,
        ) {
            let v = approach_clamped(v0, target, rate, -max, max);
            prop_assert!(v.abs() <= max);
        }

        #[test]
        fn prop_monotonic_convergence(
            v0 in -50.0f32..50.0,
            target in -10.0f32..10.0,
            rate in 0.01f32..=1.0,
        ) {
            let max = 10.0;
            let mut v = v0.clamp(-max, max);
            let mut gap = (target - v).abs();
            for _ in 0..50 {
                v = approach_clamped(v, target, rate, -max, max);
                let next_gap = (target - v).abs();
                prop_assert!(next_gap <= gap + 1e-4);
                gap = next_gap;
            }
        }
    }
}
