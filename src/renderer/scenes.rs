//! Per-game scene drawing
//!
//! Everything here takes `&self`: drawing can never change a run.

use glam::Vec2;

use super::colors::{self, with_alpha};
use super::{Align, Color, DrawList, Shape};
use crate::carpet::CarpetState;
use crate::carpet::state::ObstacleKind;
use crate::controller::Game;
use crate::guard::state::FULL_ROLL;
use crate::guard::{GuardState, ThiefState};
use crate::runner::{RunnerConfig, RunnerState};
use crate::sim::Rect;
use crate::tuning::{CarpetTuning, Course, GuardTuning};

/// A game that knows how to draw itself
pub trait Scene: Game {
    /// Logical resolution for a tuning
    fn logical(tuning: &Self::Tuning) -> Vec2;

    fn background() -> Color;

    /// Append this run's primitives
    fn draw(&self, list: &mut DrawList);

    /// Extra HUD lines below the score
    fn hud(&self) -> Vec<String>;
}

// === Slip Runner ===

const SKATER_HEIGHT: f32 = 50.0;

impl Scene for RunnerState {
    fn logical(config: &RunnerConfig) -> Vec2 {
        Vec2::new(config.tuning.width, config.tuning.height)
    }

    fn background() -> Color {
        colors::RINK_ICE
    }

    fn draw(&self, list: &mut DrawList) {
        let t = &self.tuning;
        let rink = match self.course {
            Course::Roller => colors::RINK_ROLLER,
            Course::Ice => colors::RINK_ICE,
        };
        list.rect(Rect::new(0.0, 0.0, t.width, t.height), rink);

        for crack in &self.cracks {
            let center = Vec2::new(crack.pos.x, self.screen_y(crack.pos.y));
            list.circle(center, crack.radius, colors::CRACK);
        }
        for line in &self.speed_lines {
            let y = self.screen_y(line.y);
            list.rect(Rect::new(line.x, y - 3.0, line.width, 6.0), colors::SPEED_LINE);
        }
        for mark in &self.trails {
            let alpha = 1.0 - mark.age / t.trail_secs;
            let pos = Vec2::new(mark.pos.x, self.screen_y(mark.pos.y));
            list.circle(pos, 2.0, with_alpha(colors::TRAIL, colors::TRAIL[3] * alpha));
        }
        for item in self.items.iter().filter(|i| !i.collected) {
            let center = Vec2::new(item.pos.x, self.screen_y(item.pos.y));
            list.circle(center, item.radius, colors::SPIKE_SHOE);
        }

        let tilt = match self.skater.fall {
            Some(fall) => fall.angle * fall.direction,
            // Lean into the slide
            None => (self.skater.vx * 0.03).clamp(-0.4, 0.4),
        };
        let color = if self.buff.is_some() {
            colors::SKATER_BUFFED
        } else {
            colors::SKATER
        };
        list.push(Shape::RotatedRect {
            rect: Rect::new(
                self.skater.x - t.player_width / 2.0,
                self.row() - SKATER_HEIGHT / 2.0,
                t.player_width,
                SKATER_HEIGHT,
            ),
            angle: tilt,
            color,
        });

        // Balance bar along the bottom
        let frac = self.skater.balance / t.max_balance;
        let bar = Rect::new(20.0, t.height - 36.0, t.width - 40.0, 16.0);
        list.rect(bar, colors::BAR_BACK);
        let fill = if frac < 0.3 {
            colors::BALANCE_LOW
        } else {
            colors::BALANCE_BAR
        };
        list.rect(Rect::new(bar.x, bar.y, bar.width * frac, bar.height), fill);
    }

    fn hud(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Balance {:.0}", self.skater.balance),
            format!("Distance {}", self.distance()),
        ];
        if let Some(secs) = self.buff {
            lines.push(format!("Spikes {:.1}s", secs));
        }
        lines
    }
}

// === Carpet Flight ===

impl Scene for CarpetState {
    fn logical(tuning: &CarpetTuning) -> Vec2 {
        Vec2::new(tuning.width, tuning.height)
    }

    fn background() -> Color {
        colors::SKY
    }

    fn draw(&self, list: &mut DrawList) {
        let t = &self.tuning;
        list.rect(Rect::new(0.0, 0.0, t.width, t.height), colors::SKY);

        for zone in &self.wind_zones {
            list.rect(zone.rect, colors::WIND);
        }
        for o in &self.obstacles {
            let color = match o.kind {
                ObstacleKind::Bird => colors::BIRD,
                ObstacleKind::Balloon => colors::BALLOON,
                ObstacleKind::Tower => colors::TOWER,
                ObstacleKind::StormCloud => colors::STORM_CLOUD,
            };
            match o.kind {
                ObstacleKind::Balloon => {
                    let r = o.rect;
                    list.circle(
                        Vec2::new(r.x + r.width / 2.0, r.y + r.width / 2.0),
                        r.width / 2.0,
                        color,
                    );
                    list.line(
                        Vec2::new(r.x + r.width / 2.0, r.y + r.width),
                        Vec2::new(r.x + r.width / 2.0, r.y + r.height),
                        1.5,
                        colors::BIRD,
                    );
                }
                _ => list.rect(o.rect, color),
            }
        }
        for item in &self.items {
            let center = item.rect.center();
            let radius = item.rect.width / 2.0;
            match item.collected {
                None => list.push(Shape::RotatedRect {
                    rect: item.rect,
                    angle: item.rotation,
                    color: colors::SPOOL,
                }),
                // Grow and fade over the collection window
                Some(ticks) => {
                    let k = ticks as f32 / t.collect_ticks.max(1) as f32;
                    list.ring(
                        center,
                        radius * (1.0 + k),
                        3.0,
                        with_alpha(colors::SPOOL, 1.0 - k),
                    );
                }
            }
        }

        for puff in &self.carpet.trail {
            list.circle(
                puff.pos,
                self.carpet.size.y / 2.0,
                with_alpha(colors::CARPET_BOOST, puff.alpha * 0.6),
            );
        }
        let color = if self.carpet.boost.active() {
            colors::CARPET_BOOST
        } else {
            colors::CARPET
        };
        list.push(Shape::RotatedRect {
            rect: self.carpet.rect(),
            angle: self.carpet.rotation,
            color,
        });
    }

    fn hud(&self) -> Vec<String> {
        use crate::carpet::Boost;
        let boost = match self.carpet.boost {
            Boost::Ready => "Boost ready".to_string(),
            Boost::Boosting { ticks } => format!("Boosting {:.1}s", ticks as f32 / 60.0),
            Boost::Cooldown { ticks } => format!("Boost in {:.1}s", ticks as f32 / 60.0),
        };
        vec![format!("Spools {}", self.items_collected), boost]
    }
}

// === Glare Guard ===

impl Scene for GuardState {
    fn logical(tuning: &GuardTuning) -> Vec2 {
        Vec2::new(tuning.width, tuning.height)
    }

    fn background() -> Color {
        colors::COUNTER
    }

    fn draw(&self, list: &mut DrawList) {
        let t = &self.tuning;
        let pos = self.guard.pos;
        list.rect(Rect::new(0.0, 0.0, t.width, t.height), colors::COUNTER);

        // Lucky direction hint
        let lucky = t.lucky_angle();
        let tol = t.lucky_tolerance_deg.to_radians();
        list.push(Shape::Wedge {
            center: pos,
            radius: t.glare_range * 0.5,
            start: lucky - tol,
            end: lucky + tol,
            color: colors::LUCKY,
        });

        let half = (t.glare_angle_deg / 2.0).to_radians();
        let cone = if self.guard.glaring() {
            colors::GLARE_FLASH
        } else {
            colors::GLARE_CONE
        };
        list.push(Shape::Wedge {
            center: pos,
            radius: t.glare_range,
            start: self.guard.facing - half,
            end: self.guard.facing + half,
            color: cone,
        });

        // The roll shrinks as it is eaten
        let frac = self.remaining / FULL_ROLL;
        let roll_radius = t.player_radius * (0.4 + 0.6 * frac);
        list.circle(pos, t.player_radius + 4.0, colors::GUARD);
        list.circle(pos, roll_radius, colors::ROLL);
        list.ring(pos, roll_radius, 3.0, colors::ROLL_NORI);

        for thief in &self.thieves {
            let color = match thief.state {
                ThiefState::Surprised { .. } => colors::THIEF_SURPRISED,
                ThiefState::Approaching | ThiefState::Retreating => colors::THIEF,
            };
            list.circle(thief.pos, t.thief_radius, color);
            if let ThiefState::Surprised { .. } = thief.state {
                list.text(
                    thief.pos - Vec2::new(0.0, t.thief_radius + 6.0),
                    "!",
                    24.0,
                    Align::Center,
                    colors::THIEF_SURPRISED,
                );
            }
        }

        for popup in &self.popups {
            let alpha = 1.0 - popup.age / t.popup_secs;
            let base = if popup.combo {
                colors::POPUP_COMBO
            } else {
                colors::POPUP
            };
            list.text(
                popup.pos,
                format!("+{}", popup.value),
                20.0,
                Align::Center,
                with_alpha(base, alpha),
            );
        }
    }

    fn hud(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Roll {:.0}%", self.remaining),
            format!("Driven off {}", self.defeated),
        ];
        if self.combo.multiplier() > 1.0 {
            lines.push(format!("Combo x{:.1}", self.combo.multiplier()));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::RunnerTuning;

    #[test]
    fn test_runner_scene_places_skater_on_its_row() {
        let s = RunnerState::new(RunnerTuning::default(), Course::Roller, 1);
        let mut list = DrawList::new(RunnerState::logical(&RunnerConfig::default()), RunnerState::background());
        s.draw(&mut list);
        let skater = list.shapes().iter().find_map(|shape| match shape {
            Shape::RotatedRect { rect, .. } => Some(*rect),
            _ => None,
        });
        let rect = skater.unwrap();
        assert_eq!(rect.center(), Vec2::new(240.0, 560.0));
    }

    #[test]
    fn test_collected_spike_shoes_are_hidden() {
        let mut s = RunnerState::new(RunnerTuning::default(), Course::Ice, 1);
        let mut before = DrawList::new(Vec2::ONE, colors::RINK_ICE);
        s.draw(&mut before);
        for item in s.items.iter_mut() {
            item.collected = true;
        }
        let mut after = DrawList::new(Vec2::ONE, colors::RINK_ICE);
        s.draw(&mut after);
        assert_eq!(before.len() - after.len(), 3);
    }

    #[test]
    fn test_guard_hud_shows_combo_only_when_running() {
        let mut s = GuardState::new(GuardTuning::default(), 1);
        assert_eq!(s.hud().len(), 2);
        s.combo.register(0.0);
        s.combo.register(0.5);
        assert!(s.hud().iter().any(|l| l == "Combo x1.5"));
    }

    #[test]
    fn test_carpet_hud_reports_boost() {
        let s = CarpetState::new(CarpetTuning::default(), 1);
        assert_eq!(s.hud(), vec!["Spools 0".to_string(), "Boost ready".to_string()]);
    }
}
