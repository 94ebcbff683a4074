//! Screen-space vertex carried through clipping and rasterization.

use crate::colors::Color;

/// A projected vertex with the attributes interpolated across primitives.
///
/// `x`/`y` are screen pixels (y grows downward), `depth` is view-space z
/// (larger = nearer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    pub color: Color,
}

impl ScreenVertex {
    pub const fn new(x: f32, y: f32, depth: f32, color: Color) -> Self {
        Self { x, y, depth, color }
    }

    /// Interpolates every attribute: `self + (other - self) * t`.
    #[inline]
    pub fn lerp(&self, other: &ScreenVertex, t: f32) -> ScreenVertex {
        ScreenVertex {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            depth: self.depth + (other.depth - self.depth) * t,
            color: self.color.lerp(other.color, t),
        }
    }

    /// Same vertex with x/y replaced.
    #[inline]
    pub fn with_position(&self, x: f32, y: f32) -> ScreenVertex {
        ScreenVertex { x, y, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_interpolates_all_attributes() {
        let a = ScreenVertex::new(0.0, 10.0, -4.0, Color::BLACK);
        let b = ScreenVertex::new(10.0, 0.0, 4.0, Color::WHITE);
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.x, 5.0);
        assert_relative_eq!(mid.y, 5.0);
        assert_relative_eq!(mid.depth, 0.0);
        assert_relative_eq!(mid.color.g, 0.5);
    }
}
