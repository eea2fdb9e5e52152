//! Slip Runner: keep your balance on a slippery rink
//!
//! Steering left and right costs balance; the rink's friction decides how
//! quickly the skater answers the input. Running out of balance is a fall.

pub mod state;
pub mod tick;

pub use state::RunnerState;
pub use tick::TickInput;

use crate::controller::{Game, Outcome};
use crate::platform::input::InputSnapshot;
use crate::tuning::{Course, RunnerTuning};

/// Course choice plus balance constants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerConfig {
    pub course: Course,
    pub tuning: RunnerTuning,
}

impl RunnerConfig {
    pub fn on(course: Course) -> Self {
        Self {
            course,
            tuning: RunnerTuning::default(),
        }
    }
}

impl Game for RunnerState {
    type Tuning = RunnerConfig;

    const NAME: &'static str = "Slip Runner";
    const STORAGE_KEY: &'static str = "slip_runner_highscore";

    fn new_run(config: &RunnerConfig, seed: u64) -> Self {
        RunnerState::new(config.tuning.clone(), config.course, seed)
    }

    fn step(&mut self, input: &InputSnapshot, dt: f32) -> Option<Outcome> {
        tick::tick(self, &TickInput::from(input), dt)
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn wind_down(&mut self, dt: f32) {
        tick::wind_down(self, dt);
    }

    fn animating(&self) -> bool {
        self.skater.fall.is_some_and(|f| !f.finished())
    }
}
