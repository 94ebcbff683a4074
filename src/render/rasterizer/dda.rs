//! Digital differential analyzer line drawing.

use super::{round_half_up, LineRasterizer, MajorWalk};

/// Steps the major axis one pixel at a time and the minor axis by the exact
/// slope, rounding each minor position to the nearest pixel (halves up).
#[derive(Debug, Clone, Copy, Default)]
pub struct Dda;

impl LineRasterizer for Dda {
    fn trace(&self, from: (i32, i32), to: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        let Some(walk) = MajorWalk::new(from, to) else {
            return;
        };

        let slope = walk.minor_delta as f64 / walk.steps as f64;
        let mut minor = walk.minor as f64;

        for k in 0..=walk.steps {
            let (x, y) = walk.pixel(walk.major + k, round_half_up(minor));
            plot(x, y, walk.param(k));
            minor += slope;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        Dda.trace(from, to, &mut |x, y, _| out.push((x, y)));
        out
    }

    #[test]
    fn half_slope_rounds_up() {
        assert_eq!(collect((0, 0), (2, 1)), vec![(0, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn negative_half_slope_rounds_toward_positive() {
        assert_eq!(collect((0, 0), (2, -1)), vec![(0, 0), (1, 0), (2, -1)]);
    }

    #[test]
    fn steep_line_steps_y() {
        assert_eq!(collect((0, 0), (1, 3)), vec![(0, 0), (0, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn reversed_line_walks_with_increasing_major() {
        assert_eq!(collect((4, 0), (0, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
    }
}
