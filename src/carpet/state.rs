//! Carpet Flight state
//!
//! All tuning is per fixed step (the balance was done in 60 Hz frames),
//! so timers here count ticks rather than seconds.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::collections::VecDeque;
use std::f32::consts::TAU;

use crate::sim::spawner::range;
use crate::sim::{Rect, ScoreMeter, TickTimer};
use crate::tuning::CarpetTuning;

/// Boost lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boost {
    Ready,
    Boosting { ticks: u32 },
    Cooldown { ticks: u32 },
}

impl Boost {
    pub fn active(&self) -> bool {
        matches!(self, Boost::Boosting { .. })
    }
}

/// Afterimage left while boosting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPuff {
    pub pos: Vec2,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Carpet {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    /// Cosmetic tilt (radians)
    pub rotation: f32,
    pub wobble_phase: f32,
    pub boost: Boost,
    pub trail: VecDeque<TrailPuff>,
}

impl Carpet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// How an obstacle moves besides scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Bobs up and down
    Wave,
    /// Drifts gently
    Float,
    Static,
    /// Scrolls slower than the world
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Bird,
    Balloon,
    Tower,
    StormCloud,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Bird,
        ObstacleKind::Balloon,
        ObstacleKind::Tower,
        ObstacleKind::StormCloud,
    ];

    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::Bird => Vec2::new(40.0, 30.0),
            ObstacleKind::Balloon => Vec2::new(50.0, 70.0),
            ObstacleKind::Tower => Vec2::new(60.0, 200.0),
            ObstacleKind::StormCloud => Vec2::new(80.0, 50.0),
        }
    }

    pub fn motion(&self) -> Motion {
        match self {
            ObstacleKind::Bird => Motion::Wave,
            ObstacleKind::Balloon => Motion::Float,
            ObstacleKind::Tower => Motion::Static,
            ObstacleKind::StormCloud => Motion::Slow,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Animation phase driving the motion pattern
    pub phase: f32,
}

/// Thread spool pickup
#[derive(Debug, Clone, PartialEq)]
pub struct Spool {
    pub rect: Rect,
    pub rotation: f32,
    /// Ticks since collection (None while still in play)
    pub collected: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindZone {
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarpetState {
    pub tuning: CarpetTuning,
    pub rng: Pcg32,
    pub carpet: Carpet,
    pub obstacles: Vec<Obstacle>,
    pub items: Vec<Spool>,
    pub wind_zones: Vec<WindZone>,
    pub obstacle_timer: TickTimer,
    pub item_timer: TickTimer,
    pub wind_timer: TickTimer,
    pub survival_ticks: u64,
    pub items_collected: u32,
    pub score: u64,
    pub survival_meter: ScoreMeter,
    /// Set by the tick that ended the run
    pub crashed: bool,
}

impl CarpetState {
    pub fn new(tuning: CarpetTuning, seed: u64) -> Self {
        let carpet = Carpet {
            pos: Vec2::new(tuning.player_x, tuning.height / 2.0),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            vy: 0.0,
            rotation: 0.0,
            wobble_phase: 0.0,
            boost: Boost::Ready,
            trail: VecDeque::new(),
        };
        Self {
            rng: Pcg32::seed_from_u64(seed),
            carpet,
            obstacles: Vec::new(),
            items: Vec::new(),
            wind_zones: Vec::new(),
            obstacle_timer: TickTimer::new(tuning.obstacle_interval),
            item_timer: TickTimer::new(tuning.item_interval),
            wind_timer: TickTimer::new(tuning.wind_interval),
            survival_ticks: 0,
            items_collected: 0,
            score: 0,
            survival_meter: ScoreMeter::new(),
            crashed: false,
            tuning,
        }
    }

    /// Base scroll speed from survival time
    pub fn scroll_speed(&self) -> f32 {
        let t = &self.tuning;
        (t.base_scroll_speed + self.survival_ticks as f32 * t.speed_increase_per_tick)
            .min(t.max_scroll_speed)
    }

    pub fn in_wind(&self) -> bool {
        let c = self.carpet.center();
        self.wind_zones.iter().any(|z| z.rect.contains_point(c))
    }

    /// Scroll speed with wind and boost applied
    pub fn effective_speed(&self) -> f32 {
        let mut speed = self.scroll_speed();
        if self.in_wind() {
            speed += self.tuning.wind_speed_bonus;
        }
        if self.carpet.boost.active() {
            speed *= self.tuning.boost_multiplier;
        }
        speed
    }

    pub fn spawn_x(&self) -> f32 {
        self.tuning.width + self.tuning.spawn_offset
    }

    pub(crate) fn spawn_obstacle(&mut self) {
        if crate::sim::at_cap(self.obstacles.len(), self.tuning.max_obstacles) {
            log::debug!("Obstacle cap reached, spawn dropped");
            return;
        }
        let kind = ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())];
        let size = kind.size();
        let h = self.tuning.height;
        let y = match kind {
            ObstacleKind::Tower => h - size.y,
            _ => range(&mut self.rng, 50.0, h - 100.0),
        };
        let phase = range(&mut self.rng, 0.0, TAU);
        let x = self.spawn_x();
        log::debug!("Spawned {:?} at y {:.0}", kind, y);
        self.obstacles.push(Obstacle {
            kind,
            rect: Rect::new(x, y, size.x, size.y),
            phase,
        });
    }

    pub(crate) fn spawn_item(&mut self) {
        if crate::sim::at_cap(self.items.len(), self.tuning.max_items) {
            return;
        }
        let y = range(&mut self.rng, 50.0, self.tuning.height - 50.0);
        let x = self.spawn_x();
        self.items.push(Spool {
            rect: Rect::new(x, y, 30.0, 30.0),
            rotation: 0.0,
            collected: None,
        });
    }

    pub(crate) fn spawn_wind_zone(&mut self) {
        if crate::sim::at_cap(self.wind_zones.len(), self.tuning.max_wind_zones) {
            return;
        }
        let t = &self.tuning;
        let (min_w, max_w, min_h, max_h, h) = (
            t.wind_min_width,
            t.wind_max_width,
            t.wind_min_height,
            t.wind_max_height,
            t.height,
        );
        let width = range(&mut self.rng, min_w, max_w);
        let height = range(&mut self.rng, min_h, max_h);
        let y = range(&mut self.rng, 50.0, h - height - 50.0);
        let x = self.spawn_x();
        self.wind_zones.push(WindZone {
            rect: Rect::new(x, y, width, height),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CarpetState {
        CarpetState::new(CarpetTuning::default(), 5)
    }

    #[test]
    fn test_initial_state() {
        let s = state();
        assert_eq!(s.carpet.pos, Vec2::new(100.0, 270.0));
        assert_eq!(s.carpet.boost, Boost::Ready);
        assert_eq!(s.scroll_speed(), 4.0);
        assert_eq!(s.effective_speed(), 4.0);
    }

    #[test]
    fn test_scroll_speed_caps() {
        let mut s = state();
        s.survival_ticks = 1_000_000;
        assert_eq!(s.scroll_speed(), 12.0);
    }

    #[test]
    fn test_wind_and_boost_stack() {
        let mut s = state();
        let c = s.carpet.center();
        s.wind_zones.push(WindZone {
            rect: Rect::new(c.x - 10.0, c.y - 10.0, 200.0, 100.0),
        });
        assert_eq!(s.effective_speed(), 7.0);
        s.carpet.boost = Boost::Boosting { ticks: 10 };
        assert!((s.effective_speed() - 10.5).abs() < 1e-6);
    }

    #[test]
    fn test_towers_stand_on_the_ground() {
        let mut s = state();
        for _ in 0..12 {
            s.spawn_obstacle();
        }
        for o in s.obstacles.iter().filter(|o| o.kind == ObstacleKind::Tower) {
            assert_eq!(o.rect.y + o.rect.height, 540.0);
        }
        assert!(s.obstacles.iter().all(|o| o.rect.x == 1010.0));
    }

    #[test]
    fn test_spawns_dropped_at_cap() {
        let mut s = state();
        for _ in 0..20 {
            s.spawn_obstacle();
            s.spawn_item();
            s.spawn_wind_zone();
        }
        assert_eq!(s.obstacles.len(), 12);
        assert_eq!(s.items.len(), 6);
        assert_eq!(s.wind_zones.len(), 2);
    }

    #[test]
    fn test_wind_zone_bounds() {
        let mut s = state();
        s.spawn_wind_zone();
        let z = s.wind_zones[0].rect;
        assert!((200.0..400.0).contains(&z.width));
        assert!((100.0..200.0).contains(&z.height));
        assert!(z.y >= 50.0 && z.y + z.height <= 490.0);
    }
}
