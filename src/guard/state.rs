//! Glare Guard state

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::sim::spawner::range;
use crate::sim::{Combo, DifficultyTable, Edge, ScoreMeter, SpawnTimer, random_edge_position};
use crate::tuning::{GuardStage, GuardTuning};
use crate::{angle_to, heading};

/// Full roll
pub const FULL_ROLL: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThiefState {
    /// Closing in on the roll
    Approaching,
    /// Just got glared at; frozen for a moment
    Surprised { remaining: f32 },
    /// Running back out the way it came
    Retreating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thief {
    pub pos: Vec2,
    /// Approach speed locked in at spawn (px/s)
    pub speed: f32,
    /// Edge it entered from (and will leave through)
    pub edge: Edge,
    /// Current travel direction (radians)
    pub heading: f32,
    pub wobble_time: f32,
    pub state: ThiefState,
}

impl Thief {
    pub fn approaching(&self) -> bool {
        self.state == ThiefState::Approaching
    }

    pub fn velocity(&self, retreat_speed: f32) -> Vec2 {
        match self.state {
            ThiefState::Approaching => heading(self.heading) * self.speed,
            ThiefState::Surprised { .. } => Vec2::ZERO,
            ThiefState::Retreating => heading(self.edge.outward_angle()) * retreat_speed,
        }
    }
}

/// Floating "+N" after a defeat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Popup {
    pub pos: Vec2,
    pub value: u64,
    /// Earned while a combo was running
    pub combo: bool,
    pub age: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guard {
    pub pos: Vec2,
    /// Glare direction (radians, screen space)
    pub facing: f32,
    /// Seconds until the next glare is allowed
    pub cooldown: f32,
    /// Seconds left on the glare flash effect
    pub flash: f32,
}

impl Guard {
    pub fn glaring(&self) -> bool {
        self.flash > 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuardState {
    pub tuning: GuardTuning,
    pub difficulty: DifficultyTable<GuardStage>,
    pub rng: Pcg32,
    pub guard: Guard,
    pub thieves: Vec<Thief>,
    pub popups: Vec<Popup>,
    /// Roll left (percent)
    pub remaining: f32,
    /// `remaining` as of the previous tick, for whole-percent scoring
    pub last_remaining: f32,
    pub elapsed: f32,
    pub score: u64,
    pub combo: Combo,
    pub spawn_timer: SpawnTimer,
    pub lucky_meter: ScoreMeter,
    pub defeated: u32,
    /// Set when the run ended (either way)
    pub over: bool,
}

impl GuardState {
    pub fn new(tuning: GuardTuning, seed: u64) -> Self {
        let difficulty = tuning.difficulty();
        let first = *difficulty.lookup(0.0);
        let guard = Guard {
            pos: Vec2::new(tuning.width / 2.0, tuning.height / 2.0),
            facing: 0.0,
            cooldown: 0.0,
            flash: 0.0,
        };
        Self {
            difficulty,
            rng: Pcg32::seed_from_u64(seed),
            guard,
            thieves: Vec::new(),
            popups: Vec::new(),
            remaining: FULL_ROLL,
            last_remaining: FULL_ROLL,
            elapsed: 0.0,
            score: 0,
            combo: Combo::new(tuning.combo_increment, tuning.max_combo, tuning.combo_window),
            spawn_timer: SpawnTimer::new(first.spawn_interval),
            lucky_meter: ScoreMeter::new(),
            defeated: 0,
            over: false,
            tuning,
        }
    }

    pub fn stage(&self) -> &GuardStage {
        self.difficulty.lookup(self.elapsed)
    }

    pub fn approaching_count(&self) -> usize {
        self.thieves.iter().filter(|t| t.approaching()).count()
    }

    /// Facing within the lucky direction's tolerance
    pub fn facing_lucky(&self) -> bool {
        let diff = crate::normalize_angle(self.guard.facing - self.tuning.lucky_angle());
        diff.abs() <= self.tuning.lucky_tolerance_deg.to_radians()
    }

    /// Spawn one thief at a random edge unless the approaching cap is reached
    pub(crate) fn spawn_thief(&mut self) {
        let stage = *self.stage();
        if crate::sim::at_cap(self.approaching_count(), stage.max_thieves) {
            return;
        }
        let size = Vec2::new(self.tuning.width, self.tuning.height);
        let (edge, pos) = random_edge_position(&mut self.rng, size, self.tuning.spawn_margin);
        let jitter = self.tuning.aim_jitter_deg;
        let aim = angle_to(pos, self.guard.pos) + range(&mut self.rng, -jitter, jitter).to_radians();
        log::debug!("Thief from {:?} at speed {}", edge, stage.speed);
        self.thieves.push(Thief {
            pos,
            speed: stage.speed,
            edge,
            heading: aim,
            wobble_time: 0.0,
            state: ThiefState::Approaching,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let s = GuardState::new(GuardTuning::default(), 1);
        assert_eq!(s.guard.pos, Vec2::new(400.0, 275.0));
        assert_eq!(s.remaining, 100.0);
        assert_eq!(s.spawn_timer.interval(), 2.0);
        assert_eq!(s.stage().max_thieves, 2);
    }

    #[test]
    fn test_spawn_respects_approaching_cap() {
        let mut s = GuardState::new(GuardTuning::default(), 3);
        for _ in 0..5 {
            s.spawn_thief();
        }
        assert_eq!(s.thieves.len(), 2);

        // Surprised thieves no longer count
        s.thieves[0].state = ThiefState::Surprised { remaining: 0.3 };
        s.spawn_thief();
        assert_eq!(s.thieves.len(), 3);
        assert_eq!(s.approaching_count(), 2);
    }

    #[test]
    fn test_spawned_thief_aims_near_the_guard() {
        let mut s = GuardState::new(GuardTuning::default(), 9);
        for _ in 0..2 {
            s.spawn_thief();
        }
        for t in &s.thieves {
            let direct = angle_to(t.pos, s.guard.pos);
            let off = crate::normalize_angle(t.heading - direct).abs();
            assert!(off <= 15f32.to_radians() + 1e-5);
            assert_eq!(t.speed, 80.0);
        }
    }

    #[test]
    fn test_zero_width_counter_still_spawns() {
        let tuning: GuardTuning = crate::tuning::from_json(r#"{ "width": 0.0 }"#).unwrap();
        let mut s = GuardState::new(tuning, 4);
        s.spawn_thief();
        assert_eq!(s.thieves.len(), 1);
        assert!(s.thieves[0].pos.is_finite());
    }

    #[test]
    fn test_lucky_direction() {
        let mut s = GuardState::new(GuardTuning::default(), 1);
        s.guard.facing = 157.5f32.to_radians();
        assert!(s.facing_lucky());
        s.guard.facing = (157.5f32 + 29.0).to_radians();
        assert!(s.facing_lucky());
        s.guard.facing = 0.0;
        assert!(!s.facing_lucky());
    }
}
