//! Cyrus-Beck segment clipping.
//!
//! The segment `P(t) = a + t (b - a)`, `t ∈ [0, 1]`, is tested against each
//! viewport edge through the edge's inward normal `n` and a point `e` on it:
//! `n · (P(t) - e) >= 0` keeps the point. Edges the segment enters through
//! raise the lower bound `tl`, edges it leaves through lower the upper bound
//! `tu`.

use super::{Viewport, EPSILON};
use crate::math::vec2::Vec2;
use crate::render::vertex::ScreenVertex;

/// Clips a segment to the viewport.
///
/// Returns the visible part with all attributes interpolated, or `None` when
/// nothing of the segment is inside.
pub fn clip_line(
    a: &ScreenVertex,
    b: &ScreenVertex,
    viewport: &Viewport,
) -> Option<(ScreenVertex, ScreenVertex)> {
    let code_a = viewport.outcode(a.x, a.y);
    let code_b = viewport.outcode(b.x, b.y);

    if code_a == 0 && code_b == 0 {
        return Some((*a, *b));
    }
    if code_a & code_b != 0 {
        return None;
    }

    let start = Vec2::new(a.x, a.y);
    let direction = Vec2::new(b.x, b.y) - start;

    // (inward normal, point on edge)
    let edges = [
        (Vec2::new(1.0, 0.0), viewport.min),
        (Vec2::new(-1.0, 0.0), viewport.max),
        (Vec2::new(0.0, 1.0), viewport.min),
        (Vec2::new(0.0, -1.0), viewport.max),
    ];

    let mut tl = 0.0f32;
    let mut tu = 1.0f32;

    for (normal, on_edge) in edges {
        let numerator = normal.dot(start - on_edge);
        let denominator = normal.dot(direction);

        if denominator.abs() < EPSILON {
            // Parallel to this edge: entirely on one side of it.
            if numerator < 0.0 {
                return None;
            }
            continue;
        }

        let t = -numerator / denominator;
        if denominator > 0.0 {
            tl = tl.max(t);
        } else {
            tu = tu.min(t);
        }
    }

    if tl >= tu {
        return None;
    }

    Some((a.lerp(b, tl), a.lerp(b, tu)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use approx::assert_relative_eq;

    fn viewport() -> Viewport {
        Viewport::new(Vec2::new(10.0, 10.0), Vec2::new(89.0, 89.0))
    }

    fn vertex(x: f32, y: f32) -> ScreenVertex {
        ScreenVertex::new(x, y, 0.0, Color::BLACK)
    }

    #[test]
    fn inside_segment_is_unchanged() {
        let (a, b) = (vertex(20.0, 20.0), vertex(50.0, 70.0));
        assert_eq!(clip_line(&a, &b, &viewport()), Some((a, b)));
    }

    #[test]
    fn segment_outside_one_side_is_rejected() {
        let (a, b) = (vertex(0.0, 20.0), vertex(5.0, 80.0));
        assert_eq!(clip_line(&a, &b, &viewport()), None);
    }

    #[test]
    fn segment_outside_across_corner_is_rejected() {
        // Left of the viewport at the top, above it on the right: no shared
        // outcode bit, but the segment misses the top-left corner.
        let (a, b) = (vertex(0.0, 15.0), vertex(15.0, 0.0));
        assert_eq!(clip_line(&a, &b, &viewport()), None);
    }

    #[test]
    fn crossing_segment_is_cut_at_both_edges() {
        let a = ScreenVertex::new(0.0, 50.0, -10.0, Color::BLACK);
        let b = ScreenVertex::new(100.0, 50.0, 10.0, Color::WHITE);
        let (p, q) = clip_line(&a, &b, &viewport()).unwrap();

        assert_relative_eq!(p.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(q.x, 89.0, epsilon = 1e-4);
        assert_relative_eq!(p.depth, -8.0, epsilon = 1e-4);
        assert_relative_eq!(q.color.r, 0.89, epsilon = 1e-4);
    }

    #[test]
    fn one_endpoint_inside_keeps_it() {
        let a = vertex(50.0, 50.0);
        let b = vertex(50.0, 150.0);
        let (p, q) = clip_line(&a, &b, &viewport()).unwrap();
        assert_eq!(p, a);
        assert_relative_eq!(q.y, 89.0, epsilon = 1e-4);
    }
}
