//! Rendering module
//!
//! Games never touch the screen. Each one implements `Scene`, which fills a
//! `DrawList` in logical coordinates from a read-only borrow of its state.
//! A `Renderer` backend then puts the list on screen: Canvas2D in the
//! browser, a log summary in the native demo.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod scenes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scenes::Scene;

use glam::Vec2;
use thiserror::Error;

use crate::controller::{Controller, Game, Outcome, Phase};
use crate::persistence::ScoreStore;
use crate::sim::Rect;

/// RGBA, each channel 0..=1
pub type Color = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One drawing primitive in logical coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        rect: Rect,
        color: Color,
    },
    /// Rectangle rotated about its centre
    RotatedRect {
        rect: Rect,
        angle: f32,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    /// Filled pie slice from `start` to `end` (radians, y down)
    Wedge {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        align: Align,
        color: Color,
    },
}

/// Ordered primitives for one frame, painted back to front
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub logical: Vec2,
    pub background: Color,
    shapes: Vec<Shape>,
}

impl DrawList {
    pub fn new(logical: Vec2, background: Color) -> Self {
        Self {
            logical,
            background,
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.push(Shape::Rect { rect, color });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(Shape::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn ring(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.push(Shape::Ring {
            center,
            radius,
            width,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.push(Shape::Line {
            from,
            to,
            width,
            color,
        });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, align: Align, color: Color) {
        self.push(Shape::Text {
            pos,
            text: text.into(),
            size,
            align,
            color,
        });
    }

    /// Text strings in paint order (HUD assertions, native summaries)
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering context unavailable: {0}")]
    Context(String),
    #[error("draw call failed: {0}")]
    Draw(String),
}

/// A backend that presents a finished draw list
pub trait Renderer {
    fn present(&mut self, list: &DrawList) -> Result<(), RenderError>;
}

/// Build the full frame for the controller's current phase
///
/// The scene is drawn whenever a run exists; title, pause and end screens
/// are overlaid on top of it.
pub fn compose<G, S>(controller: &Controller<G, S>) -> DrawList
where
    G: Game + Scene,
    S: ScoreStore,
{
    let logical = G::logical(controller.tuning());
    let mut list = DrawList::new(logical, G::background());
    let center = logical / 2.0;

    if let Some(run) = controller.run() {
        run.draw(&mut list);
    }

    match controller.phase() {
        Phase::Title => {
            list.text(center - Vec2::new(0.0, 60.0), G::NAME, 48.0, Align::Center, colors::TEXT);
            list.text(
                center,
                format!("Best {}", controller.high_score()),
                24.0,
                Align::Center,
                colors::TEXT_DIM,
            );
            list.text(
                center + Vec2::new(0.0, 60.0),
                "Press Enter or tap to start",
                20.0,
                Align::Center,
                colors::TEXT,
            );
        }
        Phase::Playing => hud(&mut list, controller),
        Phase::Paused => {
            hud(&mut list, controller);
            list.rect(Rect::new(0.0, 0.0, logical.x, logical.y), colors::OVERLAY);
            list.text(center, "Paused", 48.0, Align::Center, colors::TEXT);
            list.text(
                center + Vec2::new(0.0, 50.0),
                "Press P to resume, Q for title",
                20.0,
                Align::Center,
                colors::TEXT_DIM,
            );
        }
        Phase::GameOver | Phase::Cleared => {
            list.rect(Rect::new(0.0, 0.0, logical.x, logical.y), colors::OVERLAY);
            let result = controller.last_result();
            let title = match result.map(|r| r.outcome) {
                Some(Outcome::Cleared) => "Cleared!",
                _ => "Game Over",
            };
            list.text(center - Vec2::new(0.0, 60.0), title, 48.0, Align::Center, colors::TEXT);
            if let Some(r) = result {
                list.text(center, format!("Score {}", r.score), 28.0, Align::Center, colors::TEXT);
                if r.new_record {
                    list.text(
                        center + Vec2::new(0.0, 36.0),
                        "New record!",
                        22.0,
                        Align::Center,
                        colors::HIGHLIGHT,
                    );
                }
            }
            list.text(
                center + Vec2::new(0.0, 80.0),
                format!("Best {}  |  Enter to retry, Q for title", controller.high_score()),
                20.0,
                Align::Center,
                colors::TEXT_DIM,
            );
        }
    }
    list
}

fn hud<G, S>(list: &mut DrawList, controller: &Controller<G, S>)
where
    G: Game + Scene,
    S: ScoreStore,
{
    let Some(run) = controller.run() else {
        return;
    };
    let mut y = 28.0;
    list.text(Vec2::new(12.0, y), format!("Score {}", run.score()), 22.0, Align::Left, colors::TEXT);
    for line in run.hud() {
        y += 24.0;
        list.text(Vec2::new(12.0, y), line, 18.0, Align::Left, colors::TEXT_DIM);
    }
    list.text(
        Vec2::new(list.logical.x - 12.0, 28.0),
        format!("Best {}", controller.high_score()),
        18.0,
        Align::Right,
        colors::TEXT_DIM,
    );
}

/// Native backend: logs the HUD when the screen changes, and every `every` frames
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
    last_texts: Vec<String>,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last_texts: Vec::new(),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn present(&mut self, list: &DrawList) -> Result<(), RenderError> {
        self.frames += 1;
        let texts: Vec<String> = list.texts().map(str::to_owned).collect();
        // Overlays add or remove text, so a new count means a new screen
        let screen_changed = texts.len() != self.last_texts.len();
        if screen_changed || self.frames % self.every == 0 {
            log::info!("[frame {}] {} shapes | {}", self.frames, list.len(), texts.join(" | "));
        }
        self.last_texts = texts;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::guard::GuardState;
    use crate::persistence::MemoryStore;
    use crate::platform::InputSnapshot;
    use crate::tuning::GuardTuning;

    fn controller() -> Controller<GuardState, MemoryStore> {
        Controller::new(GuardTuning::default(), MemoryStore::new(), 1)
    }

    #[test]
    fn test_title_screen_shows_name_and_best() {
        let c = controller();
        let list = compose(&c);
        let texts: Vec<&str> = list.texts().collect();
        assert_eq!(texts[0], "Glare Guard");
        assert!(texts.contains(&"Best 0"));
        assert_eq!(list.logical, Vec2::new(800.0, 550.0));
    }

    #[test]
    fn test_playing_frame_has_scene_and_hud() {
        let mut c = controller();
        c.start().unwrap();
        c.frame(&InputSnapshot::default(), SIM_DT);
        let list = compose(&c);
        assert!(list.texts().any(|t| t.starts_with("Score")));
        assert!(list.texts().any(|t| t.starts_with("Roll")));
        assert!(list.len() > 4);
    }

    #[test]
    fn test_compose_does_not_touch_the_run() {
        let mut c = controller();
        c.start().unwrap();
        for _ in 0..120 {
            c.frame(&InputSnapshot::default(), SIM_DT);
        }
        let before = c.run().cloned();
        let _ = compose(&c);
        assert_eq!(c.run().cloned(), before);
    }

    #[test]
    fn test_pause_overlay() {
        let mut c = controller();
        c.start().unwrap();
        c.pause().unwrap();
        let list = compose(&c);
        assert!(list.texts().any(|t| t == "Paused"));
    }

    #[test]
    fn test_log_renderer_counts_frames() {
        let mut r = LogRenderer::new(60);
        let c = controller();
        for _ in 0..3 {
            r.present(&compose(&c)).unwrap();
        }
        assert_eq!(r.frames(), 3);
    }
}
