//! Canvas2D backend
//!
//! Logical coordinates are mapped onto the canvas with one transform per
//! frame (viewport scale plus letterbox offset), so shapes are drawn in
//! the game's own units.

use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::colors::css;
use super::{Align, DrawList, RenderError, Renderer, Shape};
use crate::platform::Viewport;

fn draw_err(e: JsValue) -> RenderError {
    RenderError::Draw(format!("{:?}", e))
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, logical: Vec2) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| RenderError::Context(format!("{:?}", e)))?
            .ok_or_else(|| RenderError::Context("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::Context("not a 2d context".into()))?;
        let display = Vec2::new(canvas.width() as f32, canvas.height() as f32);
        Ok(Self {
            canvas,
            ctx,
            viewport: Viewport::new(logical, display),
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Match the backing store to the element size (device pixels)
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.viewport
            .resize(Vec2::new(width as f32, height as f32));
        log::info!(
            "Canvas resized to {}x{} (scale {:.2})",
            width,
            height,
            self.viewport.scale()
        );
    }

    fn shape(&self, shape: &Shape) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        match shape {
            Shape::Rect { rect, color } => {
                ctx.set_fill_style_str(&css(*color));
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
            }
            Shape::RotatedRect { rect, angle, color } => {
                let c = rect.center();
                ctx.save();
                ctx.translate(c.x as f64, c.y as f64).map_err(draw_err)?;
                ctx.rotate(*angle as f64).map_err(draw_err)?;
                ctx.set_fill_style_str(&css(*color));
                ctx.fill_rect(
                    -(rect.width as f64) / 2.0,
                    -(rect.height as f64) / 2.0,
                    rect.width as f64,
                    rect.height as f64,
                );
                ctx.restore();
            }
            Shape::Circle {
                center,
                radius,
                color,
            } => {
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
                    .map_err(draw_err)?;
                ctx.set_fill_style_str(&css(*color));
                ctx.fill();
            }
            Shape::Ring {
                center,
                radius,
                width,
                color,
            } => {
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
                    .map_err(draw_err)?;
                ctx.set_line_width(*width as f64);
                ctx.set_stroke_style_str(&css(*color));
                ctx.stroke();
            }
            Shape::Wedge {
                center,
                radius,
                start,
                end,
                color,
            } => {
                ctx.begin_path();
                ctx.move_to(center.x as f64, center.y as f64);
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius.max(0.0) as f64,
                    *start as f64,
                    *end as f64,
                )
                .map_err(draw_err)?;
                ctx.close_path();
                ctx.set_fill_style_str(&css(*color));
                ctx.fill();
            }
            Shape::Line {
                from,
                to,
                width,
                color,
            } => {
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.set_line_width(*width as f64);
                ctx.set_stroke_style_str(&css(*color));
                ctx.stroke();
            }
            Shape::Text {
                pos,
                text,
                size,
                align,
                color,
            } => {
                ctx.set_font(&format!("bold {}px sans-serif", size.round()));
                ctx.set_text_align(match align {
                    Align::Left => "left",
                    Align::Center => "center",
                    Align::Right => "right",
                });
                ctx.set_fill_style_str(&css(*color));
                ctx.fill_text(text, pos.x as f64, pos.y as f64)
                    .map_err(draw_err)?;
            }
        }
        Ok(())
    }
}

impl Renderer for CanvasRenderer {
    fn present(&mut self, list: &DrawList) -> Result<(), RenderError> {
        if list.logical != self.viewport.logical() {
            self.viewport = Viewport::new(
                list.logical,
                Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32),
            );
        }
        let ctx = &self.ctx;

        // Letterbox bars
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .map_err(draw_err)?;
        ctx.set_fill_style_str("#000");
        ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );

        let scale = self.viewport.scale() as f64;
        let offset = self.viewport.offset();
        ctx.set_transform(scale, 0.0, 0.0, scale, offset.x as f64, offset.y as f64)
            .map_err(draw_err)?;

        ctx.save();
        ctx.begin_path();
        ctx.rect(0.0, 0.0, list.logical.x as f64, list.logical.y as f64);
        ctx.clip();
        ctx.set_fill_style_str(&css(list.background));
        ctx.fill_rect(0.0, 0.0, list.logical.x as f64, list.logical.y as f64);

        let result = list.shapes().iter().try_for_each(|s| self.shape(s));
        ctx.restore();
        result
    }
}
