//! 2D clipping against the screen viewport.
//!
//! The viewport is the image rectangle inset by a margin on every side:
//! `[margin, width - 1 - margin] x [margin, height - 1 - margin]`, closed.
//!
//! - [`line`]: Cyrus-Beck parametric segment clipping (wireframe edges).
//! - [`polygon`]: Sutherland-Hodgman polygon clipping by rotating the
//!   polygon so every side of the viewport is clipped as the left side.
//!
//! Both interpolate every [`ScreenVertex`](crate::render::vertex::ScreenVertex)
//! attribute at the crossings, not just the position.

pub mod line;
pub mod polygon;

pub use line::clip_line;
pub use polygon::{clip_polygon, clip_polygon_full};

use crate::math::vec2::Vec2;

/// Inset margin used when none is configured.
pub const DEFAULT_MARGIN: usize = 10;

/// Denominators with a magnitude below this count as zero.
pub(crate) const EPSILON: f32 = 1e-6;

pub const OUT_LEFT: u8 = 0b0001;
pub const OUT_RIGHT: u8 = 0b0010;
pub const OUT_TOP: u8 = 0b0100;
pub const OUT_BOTTOM: u8 = 0b1000;

/// Axis-aligned clip rectangle in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// The rectangle of a `width x height` image inset by `margin`.
    pub fn from_size(width: usize, height: usize, margin: usize) -> Self {
        let max_x = width as f32 - 1.0 - margin as f32;
        let max_y = height as f32 - 1.0 - margin as f32;
        Self::new(Vec2::new(margin as f32, margin as f32), Vec2::new(max_x, max_y))
    }

    /// True when the rectangle contains no point.
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.outcode(x, y) == 0
    }

    /// Cohen-Sutherland style region code; zero means inside.
    #[inline]
    pub fn outcode(&self, x: f32, y: f32) -> u8 {
        let mut code = 0;
        if x < self.min.x {
            code |= OUT_LEFT;
        } else if x > self.max.x {
            code |= OUT_RIGHT;
        }
        if y < self.min.y {
            code |= OUT_TOP;
        } else if y > self.max.y {
            code |= OUT_BOTTOM;
        }
        code
    }

    /// The rectangle after rotating the plane by `(x, y) -> (y, -x)`.
    pub(crate) fn rotated(&self) -> Self {
        let a = self.min.rotate_quarter();
        let b = self.max.rotate_quarter();
        Self::new(
            Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_size_insets_by_margin() {
        let vp = Viewport::from_size(100, 50, 10);
        assert_eq!(vp.min, Vec2::new(10.0, 10.0));
        assert_eq!(vp.max, Vec2::new(89.0, 39.0));
        assert!(vp.contains(10.0, 39.0));
        assert!(!vp.contains(9.5, 20.0));
    }

    #[test]
    fn tiny_image_gives_empty_viewport() {
        assert!(Viewport::from_size(15, 15, 10).is_empty());
        assert!(!Viewport::from_size(21, 21, 10).is_empty());
    }

    #[test]
    fn outcodes_combine_sides() {
        let vp = Viewport::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert_eq!(vp.outcode(-1.0, -1.0), OUT_LEFT | OUT_TOP);
        assert_eq!(vp.outcode(11.0, 11.0), OUT_RIGHT | OUT_BOTTOM);
        assert_eq!(vp.outcode(5.0, 5.0), 0);
    }

    #[test]
    fn four_rotations_restore_rectangle() {
        let vp = Viewport::new(Vec2::new(1.0, 2.0), Vec2::new(30.0, 40.0));
        let r = vp.rotated();
        assert_eq!(r.min, Vec2::new(2.0, -30.0));
        assert_eq!(r.max, Vec2::new(40.0, -1.0));
        assert_eq!(r.rotated().rotated().rotated(), vp);
    }
}
