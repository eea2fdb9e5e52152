//! Carpet Flight: side-scrolling flight through birds, balloons and towers

pub mod state;
pub mod tick;

pub use state::{Boost, CarpetState, ObstacleKind};
pub use tick::TickInput;

use crate::controller::{Game, Outcome};
use crate::platform::input::InputSnapshot;
use crate::tuning::CarpetTuning;

impl Game for CarpetState {
    type Tuning = CarpetTuning;

    const NAME: &'static str = "Carpet Flight";
    const STORAGE_KEY: &'static str = "flyingCarpetHighScore";

    fn new_run(tuning: &CarpetTuning, seed: u64) -> Self {
        CarpetState::new(tuning.clone(), seed)
    }

    fn step(&mut self, input: &InputSnapshot, dt: f32) -> Option<Outcome> {
        tick::tick(self, &TickInput::from(input), dt)
    }

    fn score(&self) -> u64 {
        self.score
    }
}
