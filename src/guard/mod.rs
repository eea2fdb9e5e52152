//! Glare Guard: keep sushi thieves off your roll with a well-aimed glare

pub mod state;
pub mod tick;

pub use state::{GuardState, ThiefState};
pub use tick::TickInput;

use crate::controller::{Game, Outcome};
use crate::platform::input::InputSnapshot;
use crate::tuning::GuardTuning;

impl Game for GuardState {
    type Tuning = GuardTuning;

    const NAME: &'static str = "Glare Guard";
    const STORAGE_KEY: &'static str = "ehomaki_highscore";

    fn new_run(tuning: &GuardTuning, seed: u64) -> Self {
        GuardState::new(tuning.clone(), seed)
    }

    fn step(&mut self, input: &InputSnapshot, dt: f32) -> Option<Outcome> {
        tick::tick(self, &TickInput::from(input), dt)
    }

    fn score(&self) -> u64 {
        self.score
    }
}
