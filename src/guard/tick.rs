//! Glare Guard fixed timestep tick

use glam::Vec2;

use super::state::{GuardState, Popup, ThiefState};
use crate::controller::Outcome;
use crate::platform::input::InputSnapshot;
use crate::sim::{circles_overlap, in_vision_cone};
use crate::{angle_to, heading};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Where the guard should look (logical coordinates)
    pub aim: Option<Vec2>,
    /// One-shot glare request
    pub glare: bool,
}

impl From<&InputSnapshot> for TickInput {
    fn from(s: &InputSnapshot) -> Self {
        Self {
            aim: s.pointer,
            glare: s.action || s.tap,
        }
    }
}

/// Advance the round by one fixed timestep
pub fn tick(state: &mut GuardState, input: &TickInput, dt: f32) -> Option<Outcome> {
    if state.over {
        return None;
    }

    if let Some(aim) = input.aim {
        state.guard.facing = angle_to(state.guard.pos, aim);
    }
    if input.glare {
        glare(state);
    }

    state.elapsed += dt;
    let now = state.elapsed;
    state.combo.expire(now);

    let t = &state.tuning;

    // Guard timers and eating
    let guard = &mut state.guard;
    if guard.cooldown > 0.0 {
        guard.cooldown -= dt;
    }
    if guard.flash > 0.0 {
        guard.flash -= dt;
    }
    state.remaining = (state.remaining - (100.0 / t.duration_secs) * dt).max(0.0);

    let eaten = state.last_remaining.floor() - state.remaining.floor();
    if eaten > 0.0 {
        state.score += eaten as u64 * t.score_per_percent;
    }
    state.last_remaining = state.remaining;

    if state.facing_lucky() {
        state.score += state.lucky_meter.add(state.tuning.score_lucky_per_sec * dt);
    }

    // Spawning follows the current difficulty row
    let interval = state.stage().spawn_interval;
    state.spawn_timer.set_interval(interval);
    if state.spawn_timer.advance(dt) {
        state.spawn_thief();
    }

    update_thieves(state, dt);

    for popup in state.popups.iter_mut() {
        popup.age += dt;
        popup.pos.y -= state.tuning.popup_rise * dt;
    }
    let life = state.tuning.popup_secs;
    state.popups.retain(|p| p.age < life);

    if state.remaining <= 0.0 {
        state.score += state.tuning.clear_bonus;
        state.over = true;
        log::info!(
            "Roll finished: {} thieves driven off, score {}",
            state.defeated,
            state.score
        );
        return Some(Outcome::Cleared);
    }

    let (pos, radius, thief_radius) = (
        state.guard.pos,
        state.tuning.player_radius,
        state.tuning.thief_radius,
    );
    if state
        .thieves
        .iter()
        .any(|th| th.approaching() && circles_overlap(th.pos, thief_radius, pos, radius))
    {
        state.over = true;
        log::info!("A thief grabbed the roll at {:.1}s", state.elapsed);
        return Some(Outcome::Failed);
    }

    None
}

/// Glare along the current facing; returns how many thieves were driven off
pub(crate) fn glare(state: &mut GuardState) -> u32 {
    if state.guard.cooldown > 0.0 {
        return 0;
    }
    let t = &state.tuning;
    state.guard.cooldown = t.glare_cooldown;
    state.guard.flash = t.glare_flash;

    let origin = state.guard.pos;
    let facing = state.guard.facing;
    let half = (t.glare_angle_deg / 2.0).to_radians();
    let range = t.glare_range;
    let now = state.elapsed;

    let mut hits = 0;
    for thief in state
        .thieves
        .iter_mut()
        .filter(|th| th.state == ThiefState::Approaching)
    {
        if !in_vision_cone(origin, facing, half, range, thief.pos) {
            continue;
        }
        thief.state = ThiefState::Surprised {
            remaining: t.surprise_secs,
        };
        let multiplier = state.combo.register(now);
        let earned = (t.score_defeat as f32 * multiplier).floor() as u64;
        state.score += earned;
        state.defeated += 1;
        hits += 1;
        state.popups.push(Popup {
            pos: thief.pos - Vec2::new(0.0, 20.0),
            value: earned,
            combo: multiplier > 1.0,
            age: 0.0,
        });
    }
    if hits > 0 {
        log::debug!("Glare drove off {} (combo x{})", hits, state.combo.multiplier());
    }
    hits
}

fn update_thieves(state: &mut GuardState, dt: f32) {
    let target = state.guard.pos;
    let t = &state.tuning;
    let wobble_amp = t.wobble_deg.to_radians();

    for thief in state.thieves.iter_mut() {
        thief.wobble_time += dt;
        match thief.state {
            ThiefState::Approaching => {
                let wobble = (thief.wobble_time * t.wobble_freq).sin() * wobble_amp;
                thief.heading = angle_to(thief.pos, target) + wobble;
                thief.pos += heading(thief.heading) * thief.speed * dt;
            }
            ThiefState::Surprised { remaining } => {
                let remaining = remaining - dt;
                thief.state = if remaining <= 0.0 {
                    ThiefState::Retreating
                } else {
                    ThiefState::Surprised { remaining }
                };
            }
            ThiefState::Retreating => {
                thief.pos += heading(thief.edge.outward_angle()) * t.retreat_speed * dt;
            }
        }
    }

    let (w, h, margin) = (t.width, t.height, t.despawn_margin);
    state.thieves.retain(|th| {
        let off = th.pos.x < -margin || th.pos.x > w + margin || th.pos.y < -margin || th.pos.y > h + margin;
        !(th.state == ThiefState::Retreating && off)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::guard::state::Thief;
    use crate::sim::Edge;
    use crate::tuning::GuardTuning;

    fn state() -> GuardState {
        GuardState::new(GuardTuning::default(), 1)
    }

    /// Approaching thief `dist` px east of the guard
    fn thief_east(s: &GuardState, dist: f32) -> Thief {
        Thief {
            pos: s.guard.pos + Vec2::new(dist, 0.0),
            speed: 80.0,
            edge: Edge::Right,
            heading: std::f32::consts::PI,
            wobble_time: 0.0,
            state: ThiefState::Approaching,
        }
    }

    fn aim_east(s: &GuardState) -> TickInput {
        TickInput {
            aim: Some(s.guard.pos + Vec2::new(100.0, 0.0)),
            glare: true,
        }
    }

    #[test]
    fn test_glare_surprises_thief_in_cone() {
        let mut s = state();
        let th = thief_east(&s, 120.0);
        s.thieves.push(th);
        let input = aim_east(&s);
        tick(&mut s, &input, SIM_DT);
        assert!(matches!(s.thieves[0].state, ThiefState::Surprised { .. }));
        assert_eq!(s.defeated, 1);
        // Defeat plus the first bite of the roll
        assert_eq!(s.score, 100 + 50);
        assert_eq!(s.popups.len(), 1);
        assert!(s.guard.glaring());
    }

    #[test]
    fn test_glare_misses_outside_range_or_angle() {
        let mut s = state();
        let far = thief_east(&s, 200.0);
        let mut behind = thief_east(&s, -100.0);
        behind.edge = Edge::Left;
        s.thieves.push(far);
        s.thieves.push(behind);
        let input = aim_east(&s);
        tick(&mut s, &input, SIM_DT);
        assert!(s.thieves.iter().all(|t| t.approaching()));
        assert_eq!(s.defeated, 0);
    }

    #[test]
    fn test_glare_cooldown() {
        let mut s = state();
        let input = aim_east(&s);
        tick(&mut s, &input, SIM_DT);
        let th = thief_east(&s, 120.0);
        s.thieves.push(th);
        // 0.3 s cooldown still running
        tick(&mut s, &input, SIM_DT);
        assert!(s.thieves[0].approaching());
        for _ in 0..20 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        s.thieves[0].pos = s.guard.pos + Vec2::new(120.0, 0.0);
        tick(&mut s, &input, SIM_DT);
        assert!(!s.thieves[0].approaching());
    }

    #[test]
    fn test_combo_chains_within_window() {
        let mut s = state();
        for d in [100.0, 110.0, 120.0] {
            let th = thief_east(&s, d);
            s.thieves.push(th);
        }
        let input = aim_east(&s);
        tick(&mut s, &input, SIM_DT);
        // 100 x1.0, 100 x1.5, 100 x2.0, plus the first percent eaten
        assert_eq!(s.score, 100 + 150 + 200 + 50);
        assert_eq!(s.combo.multiplier(), 2.0);
        assert!(s.popups[1].combo);
        assert!(!s.popups[0].combo);
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut s = state();
        for d in [100.0, 110.0] {
            let th = thief_east(&s, d);
            s.thieves.push(th);
        }
        let input = aim_east(&s);
        tick(&mut s, &input, SIM_DT);
        assert_eq!(s.combo.multiplier(), 1.5);
        for _ in 0..130 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.combo.multiplier(), 1.0);
    }

    #[test]
    fn test_surprise_then_retreat_then_removed() {
        let mut s = state();
        let th = thief_east(&s, 120.0);
        s.thieves.push(th);
        let input = aim_east(&s);
        tick(&mut s, &input, SIM_DT);
        for _ in 0..16 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert!(matches!(s.thieves[0].state, ThiefState::Surprised { .. }));
        for _ in 0..2 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.thieves[0].state, ThiefState::Retreating);

        let x = s.thieves[0].pos.x;
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert!((s.thieves[0].pos.x - (x + 5.0)).abs() < 1e-3);

        // 520 px to the edge plus 50 margin at 300 px/s
        for _ in 0..120 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert!(s.thieves.iter().all(|t| t.state != ThiefState::Retreating));
    }

    #[test]
    fn test_thief_reaching_guard_fails() {
        let mut s = state();
        let th = thief_east(&s, 51.0);
        s.thieves.push(th);
        let out = tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(out, Some(Outcome::Failed));
        assert_eq!(tick(&mut s, &TickInput::default(), SIM_DT), None);
    }

    #[test]
    fn test_finishing_the_roll_clears_before_collision() {
        let mut s = state();
        s.remaining = 0.01;
        s.last_remaining = 0.01;
        let th = thief_east(&s, 10.0);
        s.thieves.push(th);
        assert_eq!(tick(&mut s, &TickInput::default(), SIM_DT), Some(Outcome::Cleared));
        assert_eq!(s.score, 5000);
        assert_eq!(s.remaining, 0.0);
    }

    #[test]
    fn test_eating_scores_whole_percents() {
        let mut s = state();
        // The first bite crosses 100 -> 99 right away
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.score, 50);
        // 100 / 60 percent per second; one percent every 36 ticks
        for _ in 0..34 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.score, 50);
        for _ in 0..3 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert_eq!(s.score, 100);
    }

    #[test]
    fn test_lucky_direction_bonus() {
        let mut s = state();
        let lucky = s.tuning.lucky_angle();
        let aim = TickInput {
            aim: Some(s.guard.pos + heading(lucky) * 100.0),
            glare: false,
        };
        for _ in 0..60 {
            tick(&mut s, &aim, SIM_DT);
            s.thieves.clear();
        }
        // ~30 lucky points plus two eaten percents
        assert!((129..=130).contains(&s.score));
    }

    #[test]
    fn test_spawn_interval_follows_difficulty() {
        let mut s = state();
        s.elapsed = 30.0;
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.spawn_timer.interval(), 1.0);
        assert_eq!(s.stage().speed, 140.0);
    }
}
