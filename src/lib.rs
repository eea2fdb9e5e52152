//! Arcade Trio - three single-screen canvas arcade games
//!
//! Core modules:
//! - `sim`: Shared simulation building blocks (smoothing, collision, spawning, scoring)
//! - `runner`, `carpet`, `guard`: One deterministic simulation per game
//! - `controller`: Title/Playing/Paused/GameOver/Cleared state machine
//! - `platform`: Input sampling, viewport scaling and the frame driver
//! - `persistence`: Scalar high score storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod carpet;
pub mod controller;
pub mod guard;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod sim;
pub mod tuning;

pub use controller::{Action, Controller, Game, Outcome, Phase, TransitionError};
pub use highscores::HighScore;
pub use persistence::{MemoryStore, ScoreStore, StorageError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the tuned per-frame constants)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta the driver will feed into the simulation
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Angle of the vector from `from` to `to` (radians, screen space with y down)
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
