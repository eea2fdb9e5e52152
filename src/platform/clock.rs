//! Fixed timestep accumulator
//!
//! Raw frame deltas are clamped to `MAX_FRAME_DT` (a stalled tab would
//! otherwise dump seconds of time into one frame), accumulated, and paid
//! out as whole `SIM_DT` steps, at most `MAX_SUBSTEPS` per frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Timestamp of the previous animation frame (ms)
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous timestamp; the first frame counts as one step
    pub fn delta(&mut self, time_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        dt
    }

    /// Feed a raw delta; returns how many fixed steps to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Time beyond the substep cap is dropped, not carried
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Forget accumulated time (the loop stopped scheduling)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    pub fn pending(&self) -> f32 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_from_accumulated_time() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert_eq!(clock.advance(SIM_DT * 2.0), 2);
    }

    #[test]
    fn test_large_delta_is_clamped() {
        let mut clock = FrameClock::new();
        // Five seconds in the background becomes at most 0.1 s of simulation
        let steps = clock.advance(5.0);
        // 0.1 / SIM_DT is six steps, float rounding may hold the last one back
        assert!((5..=6).contains(&steps));
        assert!(clock.pending() <= SIM_DT);
    }

    #[test]
    fn test_negative_and_nan_deltas_run_nothing() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.pending(), 0.0);
    }

    #[test]
    fn test_delta_from_timestamps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), SIM_DT);
        assert!((clock.delta(1050.0) - 0.05).abs() < 1e-6);
        clock.reset();
        assert_eq!(clock.delta(9000.0), SIM_DT);
    }
}
