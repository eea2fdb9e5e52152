//! Game controller: phase state machine shared by all three games
//!
//! Phases:
//! - Title: nothing simulated, waiting for start
//! - Playing: the run advances every fixed step
//! - Paused: the run is frozen untouched
//! - GameOver / Cleared: terminal; the score has been submitted
//!
//! A run is a fresh `G` built on start/retry and dropped on exit, so no
//! state leaks between runs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::highscores::HighScore;
use crate::persistence::ScoreStore;
use crate::platform::input::InputSnapshot;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Title,
    Playing,
    Paused,
    GameOver,
    Cleared,
}

/// Player-requested transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Resume,
    Retry,
    Exit,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Failed,
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action:?} while {from:?}")]
pub struct TransitionError {
    pub from: Phase,
    pub action: Action,
}

/// One game's simulation as seen by the controller
pub trait Game: Sized {
    type Tuning: Clone + 'static;

    /// Display name used in logs
    const NAME: &'static str;
    /// High score storage key
    const STORAGE_KEY: &'static str;

    /// Build a fresh run
    fn new_run(tuning: &Self::Tuning, seed: u64) -> Self;

    /// Advance one fixed step; `Some` ends the run on this tick
    fn step(&mut self, input: &InputSnapshot, dt: f32) -> Option<Outcome>;

    fn score(&self) -> u64;

    /// Presentation-only animation after the run ended
    fn wind_down(&mut self, _dt: f32) {}

    /// True while `wind_down` still has something to animate
    fn animating(&self) -> bool {
        false
    }
}

/// Summary of the last finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub outcome: Outcome,
    pub score: u64,
    pub new_record: bool,
}

pub struct Controller<G: Game, S: ScoreStore> {
    phase: Phase,
    tuning: G::Tuning,
    run: Option<G>,
    high_score: HighScore,
    store: S,
    /// Seeds each run; reproducible from the controller seed
    seeder: Pcg32,
    last_result: Option<RunResult>,
}

impl<G: Game, S: ScoreStore> Controller<G, S> {
    pub fn new(tuning: G::Tuning, store: S, seed: u64) -> Self {
        let high_score = HighScore::load(&store, G::STORAGE_KEY);
        Self {
            phase: Phase::Title,
            tuning,
            run: None,
            high_score,
            store,
            seeder: Pcg32::seed_from_u64(seed),
            last_result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&self) -> Option<&G> {
        self.run.as_ref()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn last_result(&self) -> Option<RunResult> {
        self.last_result
    }

    pub fn tuning(&self) -> &G::Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("{}: {:?} -> {:?}", G::NAME, self.phase, phase);
        self.phase = phase;
    }

    fn guard(&self, action: Action, allowed: &[Phase]) -> Result<(), TransitionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            let err = TransitionError {
                from: self.phase,
                action,
            };
            log::warn!("{}: {}", G::NAME, err);
            Err(err)
        }
    }

    fn new_run(&mut self) {
        let seed: u64 = self.seeder.random();
        log::info!("{}: starting run (seed {})", G::NAME, seed);
        self.run = Some(G::new_run(&self.tuning, seed));
        self.last_result = None;
        self.enter(Phase::Playing);
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.guard(Action::Start, &[Phase::Title])?;
        self.new_run();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TransitionError> {
        self.guard(Action::Pause, &[Phase::Playing])?;
        self.enter(Phase::Paused);
        Ok(())
    }

    /// Tab hidden or window blurred; only meaningful while playing
    pub fn focus_lost(&mut self) {
        if self.phase == Phase::Playing {
            self.enter(Phase::Paused);
        }
    }

    pub fn resume(&mut self) -> Result<(), TransitionError> {
        self.guard(Action::Resume, &[Phase::Paused])?;
        self.enter(Phase::Playing);
        Ok(())
    }

    pub fn retry(&mut self) -> Result<(), TransitionError> {
        self.guard(Action::Retry, &[Phase::GameOver, Phase::Cleared])?;
        self.new_run();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<(), TransitionError> {
        self.guard(
            Action::Exit,
            &[Phase::Paused, Phase::GameOver, Phase::Cleared],
        )?;
        self.leave();
        Ok(())
    }

    /// Drop the run and show the title screen
    fn leave(&mut self) {
        self.run = None;
        self.enter(Phase::Title);
    }

    /// Process one fixed step of input
    pub fn frame(&mut self, input: &InputSnapshot, dt: f32) {
        match self.phase {
            Phase::Title => {
                if input.confirm || input.tap {
                    self.new_run();
                }
            }
            Phase::Playing => {
                if input.pause {
                    self.enter(Phase::Paused);
                    return;
                }
                let Some(run) = self.run.as_mut() else {
                    log::error!("{}: playing without a live run, skipping frame", G::NAME);
                    return;
                };
                if let Some(outcome) = run.step(input, dt) {
                    self.finish(outcome);
                }
            }
            Phase::Paused => {
                if input.exit {
                    self.leave();
                } else if input.pause {
                    self.enter(Phase::Playing);
                }
            }
            Phase::GameOver | Phase::Cleared => {
                if input.exit {
                    self.leave();
                    return;
                }
                let mut settled = true;
                if let Some(run) = self.run.as_mut() {
                    run.wind_down(dt);
                    settled = !run.animating();
                }
                // A tap only retries once the end animation is over
                if input.confirm || (input.tap && settled) {
                    self.new_run();
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        let score = self.run.as_ref().map_or(0, G::score);
        let new_record = match self.high_score.submit(score, &mut self.store) {
            Ok(new_record) => new_record,
            Err(e) => {
                log::warn!("{}: failed to save high score: {}", G::NAME, e);
                self.high_score.qualifies(score)
            }
        };
        log::info!(
            "{}: run ended {:?} with score {} (best {})",
            G::NAME,
            outcome,
            score,
            self.high_score.best()
        );
        self.last_result = Some(RunResult {
            outcome,
            score,
            new_record,
        });
        self.enter(match outcome {
            Outcome::Failed => Phase::GameOver,
            Outcome::Cleared => Phase::Cleared,
        });
    }

    /// True while the driver should keep requesting frames
    pub fn should_schedule(&self) -> bool {
        match self.phase {
            Phase::Playing => true,
            Phase::GameOver | Phase::Cleared => self.run.as_ref().is_some_and(G::animating),
            Phase::Title | Phase::Paused => false,
        }
    }
}
