//! Interval-driven spawning
//!
//! Each entity category owns an independent timer. When it fires the timer
//! restarts from zero and at most one entity is emitted. Requests at the
//! category cap are dropped, not queued.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI};

/// Seconds-based spawn timer
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTimer {
    elapsed: f32,
    interval: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            elapsed: 0.0,
            interval,
        }
    }

    /// Difficulty changes retune the interval without resetting progress
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval;
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advance by `dt`; true (once) when the interval is reached
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            return true;
        }
        false
    }
}

/// Tick-counting spawn timer for games tuned in frames
#[derive(Debug, Clone, PartialEq)]
pub struct TickTimer {
    ticks: u32,
    interval: u32,
}

impl TickTimer {
    pub fn new(interval: u32) -> Self {
        Self { ticks: 0, interval }
    }

    pub fn advance(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= self.interval {
            self.ticks = 0;
            return true;
        }
        false
    }
}

/// True when a category is full and a spawn request must be dropped
#[inline]
pub fn at_cap(count: usize, max: usize) -> bool {
    count >= max
}

/// Screen edge an entity entered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Direction pointing back out through this edge (screen space, y down)
    pub fn outward_angle(&self) -> f32 {
        match self {
            Edge::Top => -FRAC_PI_2,
            Edge::Right => 0.0,
            Edge::Bottom => FRAC_PI_2,
            Edge::Left => PI,
        }
    }
}

/// Pick a uniformly random edge and a position just outside it
pub fn random_edge_position<R: Rng>(rng: &mut R, size: Vec2, margin: f32) -> (Edge, Vec2) {
    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let pos = match edge {
        Edge::Top => Vec2::new(range(rng, 0.0, size.x), -margin),
        Edge::Right => Vec2::new(size.x + margin, range(rng, 0.0, size.y)),
        Edge::Bottom => Vec2::new(range(rng, 0.0, size.x), size.y + margin),
        Edge::Left => Vec2::new(-margin, range(rng, 0.0, size.y)),
    };
    (edge, pos)
}

/// Uniform sample in `[min, max)`, tolerating a collapsed range
pub fn range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}
