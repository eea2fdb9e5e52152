//! Slip Runner state
//!
//! The skater is drawn at a fixed screen row; the rink scrolls under it.
//! Entities keep world coordinates and are drawn at `y + scroll`, so a
//! growing `scroll` carries them down the screen toward the skater.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use crate::sim::ScoreMeter;
use crate::sim::spawner::range;
use crate::tuning::{Course, RunnerTuning};

/// Respawn distance ahead of the screen top for speed lines and cracks
pub const AHEAD_NEAR: (f32, f32) = (500.0, 1000.0);
/// Respawn distance ahead of the screen top for spike shoes
pub const AHEAD_FAR: (f32, f32) = (800.0, 1600.0);

/// Fall in progress after balance ran out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fall {
    /// +1 falls right, -1 falls left
    pub direction: f32,
    /// Tilt so far (radians); the fall is over at π/2
    pub angle: f32,
}

impl Fall {
    pub fn finished(&self) -> bool {
        self.angle >= FRAC_PI_2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skater {
    /// Screen x
    pub x: f32,
    /// Lateral velocity (px per frame)
    pub vx: f32,
    /// Forward velocity (negative is forward)
    pub vy: f32,
    pub target_vx: f32,
    /// 0..=100; zero means a fall
    pub balance: f32,
    pub fall: Option<Fall>,
}

/// Boost strip: crossing it pushes the skater forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLine {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Cracked ice: friction drops to almost nothing inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crack {
    pub pos: Vec2,
    pub radius: f32,
}

/// Spike shoe pickup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeShoe {
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
}

/// Skate mark left on the ice (world coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailMark {
    pub pos: Vec2,
    pub vx: f32,
    pub age: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerState {
    pub tuning: RunnerTuning,
    pub course: Course,
    pub rng: Pcg32,
    pub skater: Skater,
    /// Total forward travel (px); grows as the skater moves forward
    pub scroll: f32,
    /// Seconds survived
    pub elapsed: f32,
    pub score: u64,
    /// Friction used on the last tick (after buffs and zones)
    pub friction: f32,
    /// Remaining spike shoe seconds
    pub buff: Option<f32>,
    pub speed_lines: Vec<SpeedLine>,
    pub cracks: Vec<Crack>,
    pub items: Vec<SpikeShoe>,
    pub trails: VecDeque<TrailMark>,
    /// Time points not yet whole
    pub time_meter: ScoreMeter,
    /// Distance units already paid into `score`
    pub distance_paid: u64,
}

impl RunnerState {
    pub fn new(tuning: RunnerTuning, course: Course, seed: u64) -> Self {
        let surface = tuning.course(course).clone();
        let mut rng = Pcg32::seed_from_u64(seed);
        let w = tuning.width;

        let speed_lines = (0..tuning.speed_line_count)
            .map(|i| SpeedLine {
                x: range(&mut rng, 0.0, w),
                y: -(i as f32) * 500.0 - range(&mut rng, 0.0, 300.0),
                width: range(
                    &mut rng,
                    tuning.speed_line_width_min,
                    tuning.speed_line_width_max,
                ),
            })
            .collect();

        let cracks = if surface.hazards {
            (0..tuning.crack_count)
                .map(|i| Crack {
                    pos: Vec2::new(
                        range(&mut rng, 50.0, w - 50.0),
                        -(i as f32) * 400.0 - range(&mut rng, 0.0, 200.0) - 500.0,
                    ),
                    radius: range(&mut rng, tuning.crack_radius_min, tuning.crack_radius_max),
                })
                .collect()
        } else {
            Vec::new()
        };

        let items = if surface.items {
            (0..tuning.item_count)
                .map(|i| SpikeShoe {
                    pos: Vec2::new(
                        range(&mut rng, 30.0, w - 30.0),
                        -(i as f32) * 800.0 - range(&mut rng, 0.0, 400.0) - 1000.0,
                    ),
                    radius: tuning.item_radius,
                    collected: false,
                })
                .collect()
        } else {
            Vec::new()
        };

        let skater = Skater {
            x: w / 2.0,
            vx: 0.0,
            vy: -surface.forward_speed,
            target_vx: 0.0,
            balance: tuning.max_balance,
            fall: None,
        };

        Self {
            course,
            rng,
            skater,
            scroll: 0.0,
            elapsed: 0.0,
            score: 0,
            friction: surface.friction,
            buff: None,
            speed_lines,
            cracks,
            items,
            trails: VecDeque::new(),
            time_meter: ScoreMeter::new(),
            distance_paid: 0,
            tuning,
        }
    }

    /// Skater's fixed screen row
    pub fn row(&self) -> f32 {
        self.tuning.height * self.tuning.player_row
    }

    /// Skater position in world coordinates
    pub fn skater_world(&self) -> Vec2 {
        Vec2::new(self.skater.x, self.row() - self.scroll)
    }

    /// World y to screen y
    pub fn screen_y(&self, world_y: f32) -> f32 {
        world_y + self.scroll
    }

    /// Whole distance units travelled
    pub fn distance(&self) -> u64 {
        (self.scroll.max(0.0) / self.tuning.distance_unit).floor() as u64
    }

    pub fn fallen(&self) -> bool {
        self.skater.fall.is_some()
    }
}

/// Pick a respawn y ahead of the screen top, in world coordinates
pub(crate) fn ahead(rng: &mut Pcg32, scroll: f32, (near, far): (f32, f32)) -> f32 {
    -range(rng, near, far) - scroll
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roller_has_no_hazards() {
        let s = RunnerState::new(RunnerTuning::default(), Course::Roller, 1);
        assert_eq!(s.speed_lines.len(), 5);
        assert!(s.cracks.is_empty());
        assert!(s.items.is_empty());
        assert_eq!(s.skater.vy, -5.0);
    }

    #[test]
    fn test_ice_pools_start_ahead() {
        let s = RunnerState::new(RunnerTuning::default(), Course::Ice, 2);
        assert_eq!(s.cracks.len(), 8);
        assert_eq!(s.items.len(), 3);
        assert!(s.cracks.iter().all(|c| c.pos.y <= -500.0));
        assert!(s.items.iter().all(|i| i.pos.y <= -1000.0 && !i.collected));
        assert_eq!(s.skater.balance, 100.0);
    }

    #[test]
    fn test_same_seed_same_rink() {
        let a = RunnerState::new(RunnerTuning::default(), Course::Ice, 42);
        let b = RunnerState::new(RunnerTuning::default(), Course::Ice, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_coordinates() {
        let mut s = RunnerState::new(RunnerTuning::default(), Course::Roller, 1);
        s.scroll = 125.0;
        assert_eq!(s.row(), 560.0);
        assert_eq!(s.skater_world().y, 435.0);
        assert_eq!(s.screen_y(-25.0), 100.0);
        assert_eq!(s.distance(), 12);
    }
}
