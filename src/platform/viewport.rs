//! Logical resolution to display pixels
//!
//! Each game simulates in its own fixed logical resolution. The viewport
//! fits it into whatever the canvas measures with one uniform scale factor
//! and centres it (letterboxing the spare axis).

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    logical: Vec2,
    display: Vec2,
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    pub fn new(logical: Vec2, display: Vec2) -> Self {
        let mut vp = Self {
            logical,
            display,
            scale: 1.0,
            offset: Vec2::ZERO,
        };
        vp.resize(display);
        vp
    }

    /// Recompute scale and letterbox for a new display size
    pub fn resize(&mut self, display: Vec2) {
        self.display = display;
        let fit = display / self.logical;
        let scale = fit.x.min(fit.y);
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self.offset = (display - self.logical * self.scale) / 2.0;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn logical(&self) -> Vec2 {
        self.logical
    }

    /// Display pixel (relative to the canvas origin) to logical coordinates
    pub fn to_logical(&self, p: Vec2) -> Vec2 {
        (p - self.offset) / self.scale
    }

    pub fn to_display(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }
}
