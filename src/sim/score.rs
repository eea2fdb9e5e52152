//! Delta-based score accumulation
//!
//! Continuous sources (time survived, distance, food eaten) contribute a
//! fractional amount each tick. A meter keeps the fraction and releases only
//! whole points, so the running score is a sum of per-tick deltas.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMeter {
    /// Carried fraction, always in [0, 1)
    fraction: f64,
}

impl ScoreMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed `amount` points (may be fractional); returns the newly whole points
    pub fn add(&mut self, amount: f32) -> u64 {
        if amount <= 0.0 || !amount.is_finite() {
            return 0;
        }
        self.fraction += amount as f64;
        let whole = self.fraction.floor();
        self.fraction -= whole;
        whole as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractions_carry_between_ticks() {
        let mut m = ScoreMeter::new();
        // 10 points per second at 60 Hz
        let mut total = 0;
        for _ in 0..60 {
            total += m.add(10.0 / 60.0);
        }
        // Float carry may leave the tenth point one tick late
        assert!((9..=10).contains(&total));
        total += m.add(10.0 / 60.0);
        assert_eq!(total, 10);
    }

    #[test]
    fn test_negative_and_nan_ignored() {
        let mut m = ScoreMeter::new();
        assert_eq!(m.add(-5.0), 0);
        assert_eq!(m.add(f32::NAN), 0);
        assert_eq!(m.add(2.5), 2);
        assert_eq!(m.add(0.5), 1);
    }
}
