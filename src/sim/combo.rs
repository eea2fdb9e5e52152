//! Combo multiplier
//!
//! Rapid repeated events raise the multiplier; a gap longer than the window
//! drops it back to 1.0.

/// Baseline multiplier
pub const BASE_COMBO: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Combo {
    multiplier: f32,
    /// Time of the previous qualifying event (None before the first one)
    last_event: Option<f32>,
    increment: f32,
    max: f32,
    window: f32,
}

impl Combo {
    pub fn new(increment: f32, max: f32, window: f32) -> Self {
        Self {
            multiplier: BASE_COMBO,
            last_event: None,
            increment,
            max: max.max(BASE_COMBO),
            window,
        }
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Record a qualifying event at `now`, returning the multiplier to apply.
    pub fn register(&mut self, now: f32) -> f32 {
        let chained = self
            .last_event
            .is_some_and(|last| now - last <= self.window);
        self.multiplier = if chained {
            (self.multiplier + self.increment).min(self.max)
        } else {
            BASE_COMBO
        };
        self.last_event = Some(now);
        self.multiplier
    }

    /// Drop back to baseline once the window has passed without an event.
    /// Returns true if the multiplier changed.
    pub fn expire(&mut self, now: f32) -> bool {
        let stale = self.last_event.is_none_or(|last| now - last > self.window);
        if stale && self.multiplier > BASE_COMBO {
            self.multiplier = BASE_COMBO;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chain_and_reset() {
        let mut c = Combo::new(0.5, 5.0, 2.0);
        assert_eq!(c.register(1.0), 1.0);
        assert_eq!(c.register(2.5), 1.5);
        assert_eq!(c.register(4.5), 2.0);
        // Gap of 2.1s breaks the chain
        assert_eq!(c.register(6.6), 1.0);
    }

    #[test]
    fn test_expire_after_window() {
        let mut c = Combo::new(0.5, 5.0, 2.0);
        c.register(0.0);
        c.register(1.0);
        assert!(!c.expire(2.9));
        assert_eq!(c.multiplier(), 1.5);
        assert!(c.expire(3.1));
        assert_eq!(c.multiplier(), 1.0);
    }

    #[test]
    fn test_caps_at_max() {
        let mut c = Combo::new(0.5, 5.0, 2.0);
        for i in 0..100 {
            c.register(i as f32 * 0.01);
        }
        assert_eq!(c.multiplier(), 5.0);
    }

    proptest! {
        #[test]
        fn prop_multiplier_in_range(gaps in proptest::collection::vec(0.0f32..5.0, 1..64)) {
            let mut c = Combo::new(0.5, 5.0, 2.0);
            let mut now = 0.0;
            for gap in gaps {
                now += gap;
                let m = c.register(now);
                prop_assert!((1.0..=5.0).contains(&m));
                if gap > 2.01 {
                    prop_assert_eq!(m, 1.0);
                }
            }
        }
    }
}
