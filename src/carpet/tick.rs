//! Carpet Flight fixed timestep tick

use glam::Vec2;

use super::state::{Boost, CarpetState, Motion, TrailPuff};
use crate::controller::Outcome;
use crate::platform::input::InputSnapshot;
use crate::sim::overlaps_scaled;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Climb (key held or finger down)
    pub up: bool,
    /// One-shot boost request
    pub boost: bool,
}

impl From<&InputSnapshot> for TickInput {
    fn from(s: &InputSnapshot) -> Self {
        Self {
            up: s.up || s.touching,
            boost: s.action,
        }
    }
}

/// Advance the flight by one fixed timestep
pub fn tick(state: &mut CarpetState, input: &TickInput, dt: f32) -> Option<Outcome> {
    if state.crashed {
        return None;
    }
    state.survival_ticks += 1;

    // Speed is derived fresh each tick from the state before this update
    let speed = state.effective_speed();

    update_carpet(state, input, speed);

    if state.obstacle_timer.advance() {
        state.spawn_obstacle();
    }
    if state.item_timer.advance() {
        state.spawn_item();
    }
    if state.wind_timer.advance() {
        state.spawn_wind_zone();
    }

    for o in state.obstacles.iter_mut() {
        o.rect.x -= speed;
        o.phase += 0.05;
        match o.kind.motion() {
            Motion::Wave => o.rect.y += o.phase.sin() * 2.0,
            Motion::Float => o.rect.y += (o.phase * 0.5).sin(),
            Motion::Slow => o.rect.x += speed * 0.3,
            Motion::Static => {}
        }
    }
    for item in state.items.iter_mut() {
        item.rect.x -= speed;
        item.rotation += 0.05;
        if let Some(ticks) = item.collected.as_mut() {
            *ticks += 1;
        }
    }
    for zone in state.wind_zones.iter_mut() {
        zone.rect.x -= speed;
    }

    // Collisions: first obstacle hit ends the run
    let scale = state.tuning.hitbox_scale;
    let hitbox = state.carpet.rect().shrink(scale);
    if let Some(hit) = state
        .obstacles
        .iter()
        .find(|o| overlaps_scaled(&hitbox, &o.rect.shrink(scale), scale))
    {
        log::info!(
            "Carpet hit a {:?} after {} ticks",
            hit.kind,
            state.survival_ticks
        );
        state.crashed = true;
        return Some(Outcome::Failed);
    }

    let mut collected = 0;
    for item in state.items.iter_mut().filter(|i| i.collected.is_none()) {
        if hitbox.overlaps(&item.rect) {
            item.collected = Some(0);
            collected += 1;
        }
    }
    state.items_collected += collected;

    // Despawn past the left edge
    let margin = state.tuning.despawn_margin;
    let window = state.tuning.collect_ticks;
    state.obstacles.retain(|o| o.rect.x + o.rect.width >= -margin);
    state.items.retain(|i| {
        i.rect.x + i.rect.width >= -margin && i.collected.is_none_or(|t| t <= window)
    });
    state.wind_zones.retain(|z| z.rect.x + z.rect.width >= -margin);

    state.score += state.survival_meter.add(state.tuning.score_per_sec * dt)
        + collected as u64 * state.tuning.score_per_item;

    None
}

fn update_carpet(state: &mut CarpetState, input: &TickInput, speed: f32) {
    let t = &state.tuning;
    let carpet = &mut state.carpet;

    carpet.vy += if input.up { t.lift } else { t.gravity };
    if carpet.vy > 0.0 {
        carpet.vy *= t.fall_damping;
    }
    carpet.vy = carpet.vy.clamp(t.max_rise_speed, t.max_fall_speed);
    carpet.pos.y = (carpet.pos.y + carpet.vy).clamp(
        t.screen_margin,
        t.height - carpet.size.y - t.screen_margin,
    );

    // Boost: cooldown drains first so a press can land on the tick it ends
    if let Boost::Cooldown { ticks } = carpet.boost {
        carpet.boost = match ticks.saturating_sub(1) {
            0 => Boost::Ready,
            ticks => Boost::Cooldown { ticks },
        };
    }
    if input.boost && carpet.boost == Boost::Ready {
        carpet.boost = Boost::Boosting {
            ticks: t.boost_ticks,
        };
        log::debug!("Boost!");
    }
    if let Boost::Boosting { ticks } = carpet.boost {
        carpet.boost = match ticks.saturating_sub(1) {
            0 => Boost::Cooldown {
                ticks: t.boost_cooldown_ticks,
            },
            ticks => Boost::Boosting { ticks },
        };
    }

    carpet.wobble_phase += 0.1 + speed * 0.02;
    carpet.rotation = carpet.wobble_phase.sin() * (speed * 0.3).to_radians();

    if carpet.boost.active() {
        let center_left = Vec2::new(carpet.pos.x, carpet.pos.y + carpet.size.y / 2.0);
        carpet.trail.push_back(TrailPuff {
            pos: center_left,
            alpha: 1.0,
        });
        while carpet.trail.len() > t.boost_trail_max {
            carpet.trail.pop_front();
        }
    }
    for puff in carpet.trail.iter_mut() {
        puff.alpha -= 0.1;
        puff.pos.x -= speed;
    }
    carpet.trail.retain(|p| p.alpha > 0.0);
}
