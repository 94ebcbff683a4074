//! Sutherland-Hodgman polygon clipping by rotation.
//!
//! Only one clip edge is ever implemented: the left side `x >= min.x`. After
//! each pass the polygon and the viewport are rotated a quarter turn with
//! `(x, y) -> (y, -x)`, which brings the next side into the left position.
//! Four passes clip against all sides and, since four quarter turns are the
//! identity, leave the polygon in its original orientation.

use super::{Viewport, EPSILON};
use crate::render::vertex::ScreenVertex;

/// Clips a polygon to the viewport, with a quick containment pre-check.
///
/// - every vertex inside: the polygon is returned unchanged
/// - every vertex outside the same side: the result is empty
/// - anything else goes through [`clip_polygon_full`]
pub fn clip_polygon(polygon: &[ScreenVertex], viewport: &Viewport) -> Vec<ScreenVertex> {
    let mut all_inside = true;
    let mut common_outside = u8::MAX;
    for v in polygon {
        let code = viewport.outcode(v.x, v.y);
        all_inside &= code == 0;
        common_outside &= code;
    }

    if all_inside {
        return polygon.to_vec();
    }
    if common_outside != 0 {
        return Vec::new();
    }
    clip_polygon_full(polygon, viewport)
}

/// Clips a polygon to the viewport with four rotate-and-clip passes.
///
/// Results with fewer than three vertices are returned empty. Interpolated
/// crossing vertices carry interpolated depth and color.
pub fn clip_polygon_full(polygon: &[ScreenVertex], viewport: &Viewport) -> Vec<ScreenVertex> {
    let mut points = polygon.to_vec();
    let mut bounds = *viewport;

    for _ in 0..4 {
        points = clip_left(&points, bounds.min.x);
        if points.is_empty() {
            return points;
        }
        for p in &mut points {
            *p = p.with_position(p.y, -p.x);
        }
        bounds = bounds.rotated();
    }

    if points.len() < 3 {
        points.clear();
    }
    points
}

/// One Sutherland-Hodgman pass against `x >= x_min`.
fn clip_left(points: &[ScreenVertex], x_min: f32) -> Vec<ScreenVertex> {
    let Some(&last) = points.last() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(points.len() + 2);
    let mut prev = last;
    for &cur in points {
        let prev_inside = prev.x >= x_min;
        let cur_inside = cur.x >= x_min;

        if prev_inside != cur_inside {
            let dx = cur.x - prev.x;
            if dx.abs() >= EPSILON {
                let t = (x_min - prev.x) / dx;
                let crossing = prev.lerp(&cur, t);
                out.push(crossing.with_position(x_min, crossing.y));
            }
        }
        if cur_inside {
            out.push(cur);
        }
        prev = cur;
    }
    out
}
