//! Slip Runner fixed timestep tick

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::state::{AHEAD_FAR, AHEAD_NEAR, Fall, RunnerState, TrailMark, ahead};
use crate::controller::Outcome;
use crate::platform::input::InputSnapshot;
use crate::sim::spawner::range;
use crate::sim::{approach, approach_clamped, circles_overlap, point_in_circle};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

impl From<&InputSnapshot> for TickInput {
    fn from(s: &InputSnapshot) -> Self {
        Self {
            left: s.left,
            right: s.right,
        }
    }
}

/// Advance the run by one fixed timestep
///
/// Returns `Some(Outcome::Failed)` on the tick balance reaches zero.
pub fn tick(state: &mut RunnerState, input: &TickInput, dt: f32) -> Option<Outcome> {
    if state.fallen() {
        return None;
    }
    state.elapsed += dt;

    let t = &state.tuning;
    let surface = t.course(state.course);
    let player = state.skater_world();
    let row = state.row();

    // Friction: course base, spike shoes, then cracked ice overrides
    let mut mu = surface.friction;
    if let Some(remaining) = state.buff {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            state.buff = None;
            log::debug!("Spike shoes wore off");
        } else {
            state.buff = Some(remaining);
            mu = (mu + t.buff_bonus).min(t.buff_cap);
        }
    }
    if state
        .cracks
        .iter()
        .any(|c| point_in_circle(player, c.pos, c.radius))
    {
        mu = t.crack_friction;
    }
    state.friction = mu;

    let skater = &mut state.skater;

    for line in &state.speed_lines {
        let line_y = line.y + state.scroll;
        if row > line_y - t.speed_line_band
            && row < line_y + t.speed_line_band
            && skater.x > line.x
            && skater.x < line.x + line.width
        {
            skater.vy -= t.speed_line_boost * dt * 60.0;
        }
    }

    let reach = t.player_width / 2.0;
    for item in state.items.iter_mut().filter(|i| !i.collected) {
        if circles_overlap(player, reach, item.pos, item.radius) {
            item.collected = true;
            // One timer: a second pair refreshes, never stacks
            state.buff = Some(t.buff_secs);
            log::debug!("Spike shoes collected at {:.0}", state.scroll);
        }
    }

    skater.target_vx = if input.left {
        -t.move_force
    } else if input.right {
        t.move_force
    } else {
        0.0
    };
    skater.vx = approach_clamped(
        skater.vx,
        skater.target_vx,
        mu,
        -surface.max_speed,
        surface.max_speed,
    );
    skater.vy = approach(skater.vy, -surface.forward_speed, t.forward_rate);
    skater.x += skater.vx;

    let margin = t.player_width / 2.0;
    if skater.x < margin {
        skater.x = margin;
        skater.vx = skater.vx.abs() * t.wall_bounce;
        skater.balance -= t.wall_penalty;
    }
    if skater.x > t.width - margin {
        skater.x = t.width - margin;
        skater.vx = -skater.vx.abs() * t.wall_bounce;
        skater.balance -= t.wall_penalty;
    }

    state.scroll -= skater.vy;

    // Balance
    let turn = skater.vx.abs();
    let penalty = if mu < t.low_friction_threshold {
        t.low_friction_penalty
    } else {
        1.0
    };
    skater.balance -= turn * surface.balance_decay * dt * 10.0 * penalty;
    if turn < t.recovery_threshold {
        skater.balance += t.recovery_per_sec * dt;
    }
    skater.balance = skater.balance.clamp(0.0, t.max_balance);

    let fell = skater.balance <= 0.0;
    if fell {
        skater.fall = Some(Fall {
            direction: if skater.vx > 0.0 { 1.0 } else { -1.0 },
            angle: 0.0,
        });
    }

    // Skate trails
    if skater.vx.abs() > 0.5 || skater.vy.abs() > 1.0 {
        state.trails.push_back(TrailMark {
            pos: Vec2::new(skater.x, row - state.scroll),
            vx: skater.vx,
            age: 0.0,
        });
        while state.trails.len() > t.trail_max {
            state.trails.pop_front();
        }
    }
    for mark in state.trails.iter_mut() {
        mark.age += dt;
    }
    let trail_secs = t.trail_secs;
    state.trails.retain(|m| m.age < trail_secs);

    // Score from deltas only
    let points = state.time_meter.add(state.tuning.points_per_sec * dt);
    let distance = state.distance();
    state.score += points + distance.saturating_sub(state.distance_paid);
    state.distance_paid = state.distance_paid.max(distance);

    regenerate(state);

    if fell {
        log::info!(
            "Skater fell after {:.1}s, distance {}",
            state.elapsed,
            state.distance()
        );
        return Some(Outcome::Failed);
    }
    None
}

/// Replace entities that scrolled past the bottom with new ones ahead
pub(crate) fn regenerate(state: &mut RunnerState) {
    let limit = state.tuning.height + state.tuning.despawn_margin;
    let w = state.tuning.width;
    let scroll = state.scroll;
    let rng = &mut state.rng;

    for line in state.speed_lines.iter_mut() {
        if line.y + scroll > limit {
            line.y = ahead(rng, scroll, AHEAD_NEAR);
            line.x = range(rng, 0.0, w);
        }
    }
    for crack in state.cracks.iter_mut() {
        if crack.pos.y + scroll > limit {
            crack.pos = Vec2::new(range(rng, 50.0, w - 50.0), ahead(rng, scroll, AHEAD_NEAR));
            log::debug!("Cracked ice respawned at {:.0}", crack.pos.y);
        }
    }
    for item in state.items.iter_mut() {
        if item.pos.y + scroll > limit {
            item.pos = Vec2::new(range(rng, 30.0, w - 30.0), ahead(rng, scroll, AHEAD_FAR));
            item.collected = false;
        }
    }
}

/// Presentation-only fall animation after the run ended
pub fn wind_down(state: &mut RunnerState, dt: f32) {
    let rate = state.tuning.fall_rate;
    let skater = &mut state.skater;
    let Some(fall) = skater.fall.as_mut() else {
        return;
    };
    if fall.finished() {
        return;
    }
    fall.angle = (fall.angle + rate * dt).min(FRAC_PI_2);
    skater.x += skater.vx * 0.95;
    skater.vx *= 0.98;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::runner::state::SpikeShoe;
    use crate::tuning::{Course, RunnerTuning};
    use proptest::prelude::*;

    fn ice(seed: u64) -> RunnerState {
        RunnerState::new(RunnerTuning::default(), Course::Ice, seed)
    }

    /// Ice rink with nothing on it
    fn bare_ice() -> RunnerState {
        let mut s = ice(1);
        s.cracks.clear();
        s.items.clear();
        s.speed_lines.clear();
        s
    }

    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
    };

    #[test]
    fn test_left_wins_over_right() {
        let mut s = bare_ice();
        tick(
            &mut s,
            &TickInput {
                left: true,
                right: true,
            },
            SIM_DT,
        );
        assert_eq!(s.skater.target_vx, -15.0);
        assert!(s.skater.vx < 0.0);
    }

    #[test]
    fn test_lateral_speed_smoothing() {
        let mut s = bare_ice();
        tick(&mut s, &RIGHT, SIM_DT);
        // 0 + (15 - 0) * 0.15
        assert!((s.skater.vx - 2.25).abs() < 1e-5);
        for _ in 0..50 {
            tick(&mut s, &RIGHT, SIM_DT);
            assert!(s.skater.vx <= 10.0);
        }
    }

    #[test]
    fn test_three_spike_shoes_one_timer() {
        let mut s = bare_ice();
        let at = s.skater_world();
        s.items = (0..3)
            .map(|_| SpikeShoe {
                pos: at,
                radius: 20.0,
                collected: false,
            })
            .collect();

        tick(&mut s, &TickInput::default(), SIM_DT);
        assert!(s.items.iter().all(|i| i.collected));
        assert_eq!(s.buff, Some(10.0));

        tick(&mut s, &TickInput::default(), SIM_DT);
        let expected = (0.15f32 + 0.2).min(0.4);
        assert!((s.friction - expected).abs() < 1e-6);
        assert!((s.buff.unwrap_or(0.0) - (10.0 - SIM_DT)).abs() < 1e-4);
    }

    #[test]
    fn test_buff_expires() {
        let mut s = bare_ice();
        s.buff = Some(SIM_DT * 0.5);
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.buff, None);
        assert_eq!(s.friction, 0.15);
    }

    #[test]
    fn test_cracked_ice_overrides_buff() {
        let mut s = bare_ice();
        s.buff = Some(5.0);
        let at = s.skater_world();
        s.cracks.push(crate::runner::state::Crack {
            pos: at,
            radius: 50.0,
        });
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.friction, 0.05);
        // Buff keeps ticking underneath
        assert!(s.buff.is_some());
    }

    #[test]
    fn test_wall_bounce_costs_balance() {
        let mut s = bare_ice();
        s.skater.x = 470.0;
        s.skater.vx = 10.0;
        tick(&mut s, &RIGHT, SIM_DT);
        assert_eq!(s.skater.x, 465.0);
        assert!(s.skater.vx < 0.0);
        assert!(s.skater.balance < 90.0);
    }

    #[test]
    fn test_recovery_when_straight() {
        let mut s = bare_ice();
        s.skater.balance = 50.0;
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert!(s.skater.balance > 50.0);
    }

    #[test]
    fn test_speed_line_pushes_forward() {
        let mut s = bare_ice();
        let row = s.row();
        s.speed_lines.push(crate::runner::state::SpeedLine {
            x: s.skater.x - 30.0,
            y: row,
            width: 60.0,
        });
        let before = s.skater.vy;
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert!(s.skater.vy < before - 1.0);
    }

    #[test]
    fn test_despawn_exactly_on_crossing() {
        let mut s = ice(3);
        s.scroll = 0.0;
        s.speed_lines[0].y = 900.0;
        regenerate(&mut s);
        // Exactly at the limit stays
        assert_eq!(s.speed_lines[0].y, 900.0);

        s.speed_lines[0].y = 900.5;
        regenerate(&mut s);
        let y = s.speed_lines[0].y;
        assert!((-1000.0..=-500.0).contains(&y));
        assert_eq!(s.speed_lines.len(), 5);
    }

    #[test]
    fn test_item_respawn_resets_collected() {
        let mut s = ice(4);
        s.scroll = 2000.0;
        s.items[0].pos.y = -1000.0;
        s.items[0].collected = true;
        regenerate(&mut s);
        assert!(!s.items[0].collected);
        assert!(s.screen_y(s.items[0].pos.y) <= -800.0);
    }

    #[test]
    fn test_score_is_time_plus_distance() {
        let mut s = RunnerState::new(RunnerTuning::default(), Course::Roller, 1);
        s.speed_lines.clear();
        for _ in 0..60 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        // ~100 time points plus ~300 px / 10 distance points
        let d = s.distance();
        assert!((29..=31).contains(&d));
        assert!(s.score >= 99 + d && s.score <= 100 + d);
    }

    #[test]
    fn test_trail_cap_and_age() {
        let mut s = bare_ice();
        for _ in 0..300 {
            tick(&mut s, &TickInput::default(), SIM_DT);
            assert!(s.trails.len() <= 200);
        }
        assert!(s.trails.iter().all(|m| m.age < 3.0));
    }

    #[test]
    fn test_fall_ends_the_run_on_that_tick() {
        let mut s = bare_ice();
        s.skater.balance = 0.1;
        s.skater.vx = 10.0;
        let out = tick(&mut s, &RIGHT, SIM_DT);
        assert_eq!(out, Some(Outcome::Failed));
        assert_eq!(s.skater.balance, 0.0);
        assert_eq!(s.skater.fall.map(|f| f.direction), Some(1.0));

        // Further ticks do nothing
        let frozen = s.clone();
        assert_eq!(tick(&mut s, &RIGHT, SIM_DT), None);
        assert_eq!(s, frozen);

        for _ in 0..60 {
            wind_down(&mut s, SIM_DT);
        }
        assert!(s.skater.fall.is_some_and(|f| f.finished()));
        assert_eq!(s.score, frozen.score);
    }

    proptest! {
        #[test]
        fn prop_balance_stays_in_range(
            seed in any::<u64>(),
            inputs in prop::collection::vec((any::<bool>(), any::<bool>()), 1..400),
        ) {
            let mut s = ice(seed);
            for (left, right) in inputs {
                tick(&mut s, &TickInput { left, right }, SIM_DT);
                prop_assert!((0.0..=100.0).contains(&s.skater.balance));
                prop_assert!(s.skater.vx.abs() <= 10.0);
            }
        }
    }
}
