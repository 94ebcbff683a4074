//! Bresenham line drawing.
//!
//! Bresenham's algorithm determines which pixels to illuminate using only
//! integer arithmetic. An error term tracks twice the distance between the
//! ideal line and the pixel center half a step ahead; when it reaches zero
//! the walk also steps along the minor axis.
//!
//! Ties (the ideal line passing exactly between two pixels) are resolved
//! toward +infinity on the minor axis, matching the rounding used by
//! [`Dda`](super::Dda):
//! - minor axis increasing: step when `p >= 0`
//! - minor axis decreasing: step when `p > 0`

use super::{LineRasterizer, MajorWalk};

#[derive(Debug, Clone, Copy, Default)]
pub struct Bresenham;

impl LineRasterizer for Bresenham {
    fn trace(&self, from: (i32, i32), to: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        let Some(walk) = MajorWalk::new(from, to) else {
            return;
        };

        let d_major = walk.steps;
        let d_minor = walk.minor_delta.abs();
        let direction = walk.minor_delta.signum();

        let straight = 2 * d_minor;
        let diagonal = 2 * d_minor - 2 * d_major;
        let mut p = 2 * d_minor - d_major;
        let mut minor = walk.minor;

        for k in 0..=d_major {
            let (x, y) = walk.pixel(walk.major + k, minor);
            plot(x, y, walk.param(k));

            let step = if direction > 0 { p >= 0 } else { p > 0 };
            if step {
                minor += direction;
                p += diagonal;
            } else {
                p += straight;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        Bresenham.trace(from, to, &mut |x, y, _| out.push((x, y)));
        out
    }

    #[test]
    fn horizontal_and_vertical_lines() {
        assert_eq!(collect((0, 2), (3, 2)), vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(collect((1, 3), (1, 0)), vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn diagonal_is_y_major() {
        assert_eq!(collect((0, 0), (3, -3)), vec![(3, -3), (2, -2), (1, -1), (0, 0)]);
    }

    #[test]
    fn tie_rule_follows_slope_sign() {
        assert_eq!(collect((0, 0), (2, 1)), vec![(0, 0), (1, 1), (2, 1)]);
        assert_eq!(collect((0, 0), (2, -1)), vec![(0, 0), (1, 0), (2, -1)]);
    }
}
