//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, mouse, touch) in logical coordinates
//! - Display scaling
//! - Frame timing and the fixed-step driver

pub mod clock;
pub mod input;
pub mod viewport;

pub use clock::FrameClock;
pub use input::{InputSnapshot, InputSource, InputState, Key, RawEvent, ScriptedInput};
pub use viewport::Viewport;

use crate::consts::SIM_DT;
use crate::controller::{Controller, Game};
use crate::persistence::ScoreStore;

/// Run one animation frame: clamp, accumulate and step the controller
///
/// Input is sampled once per fixed step. Returns the number of steps run.
/// When the controller stops scheduling, the clock is reset so a later
/// resume starts from zero accumulated time.
pub fn drive<G, S, I>(
    controller: &mut Controller<G, S>,
    clock: &mut FrameClock,
    input: &mut I,
    dt: f32,
) -> u32
where
    G: Game,
    S: ScoreStore,
    I: InputSource + ?Sized,
{
    let steps = clock.advance(dt);
    let mut ran = 0;
    for _ in 0..steps {
        let snapshot = input.sample();
        controller.frame(&snapshot, SIM_DT);
        ran += 1;
        if !controller.should_schedule() {
            break;
        }
    }
    if !controller.should_schedule() {
        clock.reset();
    }
    ran
}
