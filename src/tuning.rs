//! Data-driven game balance
//!
//! Every hand-tuned constant lives here with its default. A partial JSON
//! document can override any subset of fields:
//!
//! ```
//! use arcade_trio::tuning::{self, CarpetTuning};
//! let t: CarpetTuning = tuning::from_json(r#"{ "gravity": 0.5 }"#).unwrap();
//! assert_eq!(t.gravity, 0.5);
//! assert_eq!(t.boost_ticks, 120);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::sim::difficulty::{DifficultyTable, Staged};

/// Parse a (possibly partial) tuning document
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(json)
}

// === Slip Runner ===

/// Which rink the runner skates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Course {
    #[default]
    Roller,
    Ice,
}

impl Course {
    pub fn as_str(&self) -> &'static str {
        match self {
            Course::Roller => "ROLLER SKATE",
            Course::Ice => "ICE",
        }
    }
}

/// Surface parameters for one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseTuning {
    /// Friction coefficient, used as the smoothing rate toward target speed
    pub friction: f32,
    /// Lateral speed clamp (px per frame)
    pub max_speed: f32,
    /// Forward speed the skater settles at (px per frame)
    pub forward_speed: f32,
    /// Balance lost per unit of lateral speed
    pub balance_decay: f32,
    /// Cracked ice zones present
    pub hazards: bool,
    /// Spike shoe pickups present
    pub items: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    pub width: f32,
    pub height: f32,
    pub roller: CourseTuning,
    pub ice: CourseTuning,

    pub player_width: f32,
    /// Skater's fixed screen row as a fraction of height
    pub player_row: f32,
    /// Target lateral speed while a direction is held
    pub move_force: f32,
    /// Smoothing rate toward forward speed
    pub forward_rate: f32,

    pub max_balance: f32,
    pub wall_penalty: f32,
    pub wall_bounce: f32,
    pub recovery_per_sec: f32,
    /// Below this lateral speed the skater regains balance
    pub recovery_threshold: f32,
    pub low_friction_threshold: f32,
    pub low_friction_penalty: f32,

    pub buff_bonus: f32,
    pub buff_cap: f32,
    pub buff_secs: f32,

    pub crack_friction: f32,
    pub crack_radius_min: f32,
    pub crack_radius_max: f32,
    pub item_radius: f32,
    pub speed_line_boost: f32,
    /// Half height of a speed line's trigger band
    pub speed_line_band: f32,
    pub speed_line_width_min: f32,
    pub speed_line_width_max: f32,

    pub speed_line_count: usize,
    pub crack_count: usize,
    pub item_count: usize,
    /// Distance below the screen bottom at which entities despawn
    pub despawn_margin: f32,

    pub trail_max: usize,
    pub trail_secs: f32,

    pub points_per_sec: f32,
    /// Scroll pixels per distance unit (one point each)
    pub distance_unit: f32,

    /// Fall animation speed (radians per second)
    pub fall_rate: f32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 800.0,
            roller: CourseTuning {
                friction: 0.35,
                max_speed: 8.0,
                forward_speed: 5.0,
                balance_decay: 0.3,
                hazards: false,
                items: false,
            },
            ice: CourseTuning {
                friction: 0.15,
                max_speed: 10.0,
                forward_speed: 4.0,
                balance_decay: 0.5,
                hazards: true,
                items: true,
            },

            player_width: 30.0,
            player_row: 0.7,
            move_force: 15.0,
            forward_rate: 0.1,

            max_balance: 100.0,
            wall_penalty: 10.0,
            wall_bounce: 0.5,
            recovery_per_sec: 5.0,
            recovery_threshold: 1.0,
            low_friction_threshold: 0.1,
            low_friction_penalty: 2.0,

            buff_bonus: 0.2,
            buff_cap: 0.4,
            buff_secs: 10.0,

            crack_friction: 0.05,
            crack_radius_min: 40.0,
            crack_radius_max: 70.0,
            item_radius: 20.0,
            speed_line_boost: 2.0,
            speed_line_band: 10.0,
            speed_line_width_min: 60.0,
            speed_line_width_max: 100.0,

            speed_line_count: 5,
            crack_count: 8,
            item_count: 3,
            despawn_margin: 100.0,

            trail_max: 200,
            trail_secs: 3.0,

            points_per_sec: 100.0,
            distance_unit: 10.0,

            fall_rate: 5.0,
        }
    }
}

impl RunnerTuning {
    pub fn course(&self, course: Course) -> &CourseTuning {
        match course {
            Course::Roller => &self.roller,
            Course::Ice => &self.ice,
        }
    }
}

// === Carpet Flight ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarpetTuning {
    pub width: f32,
    pub height: f32,

    // Player physics (per frame)
    pub gravity: f32,
    pub lift: f32,
    pub max_fall_speed: f32,
    pub max_rise_speed: f32,
    /// Applied to downward velocity for a floaty descent
    pub fall_damping: f32,
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub screen_margin: f32,

    // Progression
    pub base_scroll_speed: f32,
    pub max_scroll_speed: f32,
    pub speed_increase_per_tick: f32,

    // Boost
    pub boost_ticks: u32,
    pub boost_cooldown_ticks: u32,
    pub boost_multiplier: f32,
    pub boost_trail_max: usize,

    // Wind zones
    pub wind_speed_bonus: f32,
    pub wind_min_width: f32,
    pub wind_max_width: f32,
    pub wind_min_height: f32,
    pub wind_max_height: f32,

    // Spawning (ticks)
    pub obstacle_interval: u32,
    pub item_interval: u32,
    pub wind_interval: u32,
    pub max_obstacles: usize,
    pub max_items: usize,
    pub max_wind_zones: usize,
    /// Spawn this far past the right edge
    pub spawn_offset: f32,
    /// Despawn this far past the left edge
    pub despawn_margin: f32,
    pub collect_ticks: u32,

    /// Hitbox shrink factor (0-1, smaller is more forgiving)
    pub hitbox_scale: f32,

    pub score_per_sec: f32,
    pub score_per_item: u64,
}

impl Default for CarpetTuning {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,

            gravity: 0.3,
            lift: -0.8,
            max_fall_speed: 8.0,
            max_rise_speed: -10.0,
            fall_damping: 0.95,
            player_x: 100.0,
            player_width: 80.0,
            player_height: 30.0,
            screen_margin: 10.0,

            base_scroll_speed: 4.0,
            max_scroll_speed: 12.0,
            speed_increase_per_tick: 0.001,

            boost_ticks: 120,
            boost_cooldown_ticks: 300,
            boost_multiplier: 1.5,
            boost_trail_max: 10,

            wind_speed_bonus: 3.0,
            wind_min_width: 200.0,
            wind_max_width: 400.0,
            wind_min_height: 100.0,
            wind_max_height: 200.0,

            obstacle_interval: 90,
            item_interval: 150,
            wind_interval: 600,
            max_obstacles: 12,
            max_items: 6,
            max_wind_zones: 2,
            spawn_offset: 50.0,
            despawn_margin: 50.0,
            collect_ticks: 15,

            hitbox_scale: 0.7,

            score_per_sec: 10.0,
            score_per_item: 100,
        }
    }
}

// === Glare Guard ===

/// One row of the thief difficulty table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardStage {
    /// Elapsed seconds at which this row takes effect
    pub time: f32,
    pub spawn_interval: f32,
    pub speed: f32,
    pub max_thieves: usize,
}

impl Staged for GuardStage {
    fn threshold(&self) -> f32 {
        self.time
    }
}

fn default_guard_stages() -> Vec<GuardStage> {
    [
        (0.0, 2.0, 80.0, 2),
        (10.0, 1.5, 100.0, 3),
        (20.0, 1.2, 120.0, 4),
        (30.0, 1.0, 140.0, 5),
        (45.0, 0.8, 160.0, 6),
        (60.0, 0.6, 180.0, 8),
    ]
    .into_iter()
    .map(|(time, spawn_interval, speed, max_thieves)| GuardStage {
        time,
        spawn_interval,
        speed,
        max_thieves,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardTuning {
    pub width: f32,
    pub height: f32,

    /// Seconds to finish the roll
    pub duration_secs: f32,
    pub glare_cooldown: f32,
    pub glare_flash: f32,
    /// Full width of the vision cone (degrees)
    pub glare_angle_deg: f32,
    pub glare_range: f32,
    pub player_radius: f32,
    pub thief_radius: f32,

    /// Compass bearing of the lucky direction (degrees, 0 = north)
    pub lucky_bearing_deg: f32,
    pub lucky_tolerance_deg: f32,
    pub score_lucky_per_sec: f32,

    pub score_defeat: u64,
    pub score_per_percent: u64,
    pub clear_bonus: u64,
    pub combo_window: f32,
    pub combo_increment: f32,
    pub max_combo: f32,

    pub surprise_secs: f32,
    pub retreat_speed: f32,
    pub aim_jitter_deg: f32,
    pub wobble_deg: f32,
    pub wobble_freq: f32,
    pub spawn_margin: f32,
    pub despawn_margin: f32,

    pub popup_secs: f32,
    pub popup_rise: f32,

    pub stages: Vec<GuardStage>,
}

impl Default for GuardTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 550.0,

            duration_secs: 60.0,
            glare_cooldown: 0.3,
            glare_flash: 0.15,
            glare_angle_deg: 45.0,
            glare_range: 150.0,
            player_radius: 20.0,
            thief_radius: 30.0,

            lucky_bearing_deg: 247.5,
            lucky_tolerance_deg: 30.0,
            score_lucky_per_sec: 30.0,

            score_defeat: 100,
            score_per_percent: 50,
            clear_bonus: 5000,
            combo_window: 2.0,
            combo_increment: 0.5,
            max_combo: 5.0,

            surprise_secs: 0.3,
            retreat_speed: 300.0,
            aim_jitter_deg: 15.0,
            wobble_deg: 5.0,
            wobble_freq: 3.0,
            spawn_margin: 20.0,
            despawn_margin: 50.0,

            popup_secs: 1.0,
            popup_rise: 50.0,

            stages: default_guard_stages(),
        }
    }
}

impl GuardTuning {
    /// Difficulty table built from `stages`; falls back to the defaults when empty
    pub fn difficulty(&self) -> DifficultyTable<GuardStage> {
        DifficultyTable::new(self.stages.clone()).unwrap_or_else(|| {
            log::warn!("Empty guard difficulty table, using defaults");
            DifficultyTable::from_rows(default_guard_stages())
        })
    }

    /// Lucky direction as a screen-space angle (radians, y down, 0 = east)
    pub fn lucky_angle(&self) -> f32 {
        crate::normalize_angle((self.lucky_bearing_deg - 90.0).to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let t: RunnerTuning = from_json(r#"{ "move_force": 12.0 }"#).unwrap();
        assert_eq!(t.move_force, 12.0);
        assert_eq!(t.ice, RunnerTuning::default().ice);
    }

    #[test]
    fn test_empty_stage_list_falls_back() {
        let t: GuardTuning = from_json(r#"{ "stages": [] }"#).unwrap();
        let table = t.difficulty();
        assert_eq!(table.lookup(0.0).max_thieves, 2);
    }

    #[test]
    fn test_lucky_angle_points_west_southwest() {
        let a = GuardTuning::default().lucky_angle();
        let dir = crate::heading(a);
        // West is -x, south is +y on screen
        assert!(dir.x < -0.9);
        assert!(dir.y > 0.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(from_json::<CarpetTuning>("{ gravity: }").is_err());
    }
}
