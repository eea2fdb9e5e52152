//! Hit testing between the player and scrolling entities
//!
//! Three shapes cover all three games: circles (runner zones, guard
//! thieves), shrink-scaled rectangles (carpet hitboxes) and a vision cone
//! (the guard's glare).

use glam::Vec2;

use crate::{angle_to, normalize_angle};

/// An axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Scale about the centre (scale < 1 gives a more forgiving hitbox)
    pub fn shrink(&self, scale: f32) -> Rect {
        let w = self.width * scale;
        let h = self.height * scale;
        Rect {
            x: self.x + (self.width - w) / 2.0,
            y: self.y + (self.height - h) / 2.0,
            width: w,
            height: h,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Strict interior test
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }
}

/// Shrink both rectangles by `scale` before testing overlap
pub fn overlaps_scaled(a: &Rect, b: &Rect, scale: f32) -> bool {
    a.shrink(scale).overlaps(&b.shrink(scale))
}

/// Circle-circle test (strict)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Point strictly inside a circle
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) < radius * radius
}

/// Directional sector test
///
/// True when `target` is within `radius` of `origin` (inclusive) and its
/// bearing differs from `facing` by at most `half_width` radians.
pub fn in_vision_cone(origin: Vec2, facing: f32, half_width: f32, radius: f32, target: Vec2) -> bool {
    if origin.distance(target) > radius {
        return false;
    }
    let diff = normalize_angle(angle_to(origin, target) - facing);
    diff.abs() <= half_width
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_shrink_keeps_center() {
        let r = Rect::new(10.0, 20.0, 80.0, 30.0);
        let s = r.shrink(0.7);
        assert!((s.center() - r.center()).length() < 1e-4);
        assert!((s.width - 56.0).abs() < 1e-4);
        assert!((s.height - 21.0).abs() < 1e-4);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 10.0, 10.0)));
    }

    #[test]
    fn test_scaled_overlap_is_more_forgiving() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        // Shrinking each by half leaves a 5px gap
        assert!(!overlaps_scaled(&a, &b, 0.5));
    }

    #[test]
    fn test_circles() {
        assert!(circles_overlap(Vec2::ZERO, 20.0, Vec2::new(49.0, 0.0), 30.0));
        assert!(!circles_overlap(Vec2::ZERO, 20.0, Vec2::new(50.0, 0.0), 30.0));
        assert!(point_in_circle(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.1));
    }

    #[test]
    fn test_vision_cone() {
        let half = (45.0f32 / 2.0).to_radians();
        // Facing east
        assert!(in_vision_cone(Vec2::ZERO, 0.0, half, 150.0, Vec2::new(100.0, 10.0)));
        // Too far
        assert!(!in_vision_cone(Vec2::ZERO, 0.0, half, 150.0, Vec2::new(151.0, 0.0)));
        // Behind
        assert!(!in_vision_cone(Vec2::ZERO, 0.0, half, 150.0, Vec2::new(-100.0, 0.0)));
        // Outside the half width
        assert!(!in_vision_cone(Vec2::ZERO, 0.0, half, 150.0, Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn test_vision_cone_across_wraparound() {
        // Facing west, target slightly above and below the -π/π seam
        let half = 0.2;
        assert!(in_vision_cone(Vec2::ZERO, PI, half, 100.0, Vec2::new(-50.0, 5.0)));
        assert!(in_vision_cone(Vec2::ZERO, -PI, half, 100.0, Vec2::new(-50.0, -5.0)));
    }
}
