//! Shared simulation building blocks
//!
//! Everything here is pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (callers pass their own `Pcg32`)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combo;
pub mod difficulty;
pub mod physics;
pub mod score;
pub mod spawner;

pub use collision::{Rect, circles_overlap, in_vision_cone, overlaps_scaled, point_in_circle};
pub use combo::Combo;
pub use difficulty::{DifficultyTable, Staged};
pub use physics::{approach, approach_clamped};
pub use score::ScoreMeter;
pub use spawner::{Edge, SpawnTimer, TickTimer, at_cap, random_edge_position};
