//! Scanline polygon filling.
//!
//! Vertex y coordinates are rounded to whole scanlines while x stays
//! fractional. Every edge covers the half-open row range
//! `[y_top, y_bottom)`: its bottom row belongs to whatever continues below,
//! so adjacent triangles and polygon sides never fill a row twice.
//!
//! # Triangles
//!
//! ```text
//!        v0                   v0
//!        /\                   /\
//!       /  \                 /  \
//!      /    \       =>     v1----split    flat-bottom
//!    v1      \               \    \
//!      \      \               \    \      flat-top
//!        \_____\               \____\
//!              v2                    v2
//! ```
//!
//! A triangle that already has a horizontal side is scanned directly;
//! otherwise it is split at the middle vertex's row with a vertex
//! interpolated on the long edge `v0 -> v2`.
//!
//! # Larger polygons
//!
//! Polygons with more than three sides use an active edge table: edges are
//! bucketed by their first row and swept top to bottom. On every row the
//! active edges, ordered by `(x, dx/dy)`, pair up into spans.
//!
//! All spans are drawn through the line rasterizer, which carries the
//! depth test and interpolates depth and color across the span.

use super::{to_pixel, FillError, LineRasterizer};
use crate::colors::Color;
use crate::render::framebuffer::FrameBuffer;
use crate::render::vertex::ScreenVertex;

/// Largest tolerated order inversion (pixels) between neighbouring active
/// edges before the polygon is treated as self-intersecting.
const CROSSING_TOLERANCE: f32 = 0.5;

/// Linear walk of one edge's attributes, one scanline per step.
#[derive(Debug, Clone, Copy)]
struct EdgeWalker {
    x: f32,
    /// dx per scanline.
    w: f32,
    depth: f32,
    depth_step: f32,
    color: Color,
    color_delta: Color,
    inv_rows: f32,
}

impl EdgeWalker {
    /// Walker from `top` toward `bottom`; both y must already be whole rows
    /// with `bottom.y > top.y`.
    fn new(top: &ScreenVertex, bottom: &ScreenVertex) -> Self {
        let rows = bottom.y - top.y;
        let inv_rows = 1.0 / rows;
        Self {
            x: top.x,
            w: (bottom.x - top.x) * inv_rows,
            depth: top.depth,
            depth_step: (bottom.depth - top.depth) * inv_rows,
            color: top.color,
            color_delta: bottom.color.delta(top.color),
            inv_rows,
        }
    }

    #[inline]
    fn at(&self, y: i32) -> ScreenVertex {
        ScreenVertex::new(self.x, y as f32, self.depth, self.color)
    }

    #[inline]
    fn advance(&mut self) {
        self.x += self.w;
        self.depth += self.depth_step;
        self.color = self.color.step(self.color_delta, self.inv_rows);
    }
}

#[inline]
fn snap_row(v: &ScreenVertex) -> ScreenVertex {
    v.with_position(v.x, to_pixel(v.y) as f32)
}

/// Fills a triangle by flat-top / flat-bottom decomposition.
///
/// Triangles whose vertices all round to the same row are skipped.
pub fn fill_triangle(
    vertices: [ScreenVertex; 3],
    line: &impl LineRasterizer,
    buffer: &mut FrameBuffer,
) {
    let mut v = vertices.map(|v| snap_row(&v));
    v.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    let [v0, v1, v2] = v;

    if v0.y == v2.y {
        return;
    }

    if v0.y == v1.y {
        scan_edges(&v0, &v2, &v1, &v2, line, buffer);
    } else if v1.y == v2.y {
        scan_edges(&v0, &v1, &v0, &v2, line, buffer);
    } else {
        let t = (v1.y - v0.y) / (v2.y - v0.y);
        let split = v0.lerp(&v2, t);
        let split = split.with_position(split.x, v1.y);
        fill_triangle([v0, v1, split], line, buffer);
        fill_triangle([v1, split, v2], line, buffer);
    }
}

/// Scans the rows between two edges that start on one row and end on another.
fn scan_edges(
    a_top: &ScreenVertex,
    a_bottom: &ScreenVertex,
    b_top: &ScreenVertex,
    b_bottom: &ScreenVertex,
    line: &impl LineRasterizer,
    buffer: &mut FrameBuffer,
) {
    let y_top = a_top.y as i32;
    let rows = a_bottom.y as i32 - y_top;
    if rows <= 0 {
        return;
    }

    let mut left = EdgeWalker::new(a_top, a_bottom);
    let mut right = EdgeWalker::new(b_top, b_bottom);
    for row in 0..rows {
        let y = y_top + row;
        line.draw_line(&left.at(y), &right.at(y), buffer);
        left.advance();
        right.advance();
    }
}

/// One edge of the active edge table.
#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    walker: EdgeWalker,
    /// Rows left after the current one.
    remaining: i32,
}

/// Fills a polygon with an active edge table sweep.
///
/// Horizontal sides are ignored; the sides next to them already bound the
/// row.
///
/// # Errors
/// - [`FillError::CrossingEdges`] when two active edges swap order between
///   rows, which only happens for self-intersecting polygons
///
/// A closed polygon always has an even number of edges on every row, so
/// [`FillError::OddActiveEdges`] is not raised here; it guards the sweep
/// against edge lists that do not close.
///
/// Rows drawn before the error stay in the buffer.
pub fn fill_polygon(
    polygon: &[ScreenVertex],
    line: &impl LineRasterizer,
    buffer: &mut FrameBuffer,
) -> Result<(), FillError> {
    if polygon.len() < 3 {
        return Ok(());
    }
    let points: Vec<ScreenVertex> = polygon.iter().map(snap_row).collect();
    let edges: Vec<(ScreenVertex, ScreenVertex)> = points
        .iter()
        .enumerate()
        .map(|(i, start)| (*start, points[(i + 1) % points.len()]))
        .collect();
    sweep_edges(&edges, line, buffer)
}

/// Active edge table sweep over edges whose endpoints sit on whole rows.
fn sweep_edges(
    edges: &[(ScreenVertex, ScreenVertex)],
    line: &impl LineRasterizer,
    buffer: &mut FrameBuffer,
) -> Result<(), FillError> {
    let rows = edges.iter().flat_map(|(a, b)| [a.y as i32, b.y as i32]);
    let y_min = rows.clone().min().unwrap_or(0);
    let y_max = rows.max().unwrap_or(0);
    if y_min == y_max {
        return Ok(());
    }

    let mut table: Vec<Vec<EdgeRecord>> = vec![Vec::new(); (y_max - y_min) as usize];
    for (start, end) in edges {
        if start.y == end.y {
            continue;
        }
        let (top, bottom) = if start.y < end.y { (start, end) } else { (end, start) };
        let record = EdgeRecord {
            walker: EdgeWalker::new(top, bottom),
            remaining: (bottom.y - top.y) as i32 - 1,
        };
        table[(top.y as i32 - y_min) as usize].push(record);
    }

    let mut active: Vec<EdgeRecord> = Vec::new();
    for (offset, bucket) in table.into_iter().enumerate() {
        let y = y_min + offset as i32;
        active.extend(bucket);
        active.sort_by(|a, b| {
            a.walker
                .x
                .total_cmp(&b.walker.x)
                .then(a.walker.w.total_cmp(&b.walker.w))
        });

        if active.len() % 2 != 0 {
            return Err(FillError::OddActiveEdges {
                scanline: y,
                count: active.len(),
            });
        }

        for pair in active.chunks_exact(2) {
            line.draw_line(&pair[0].walker.at(y), &pair[1].walker.at(y), buffer);
        }

        active.retain(|e| e.remaining > 0);
        for edge in &mut active {
            edge.walker.advance();
            edge.remaining -= 1;
        }

        if active
            .windows(2)
            .any(|w| w[0].walker.x > w[1].walker.x + CROSSING_TOLERANCE)
        {
            return Err(FillError::CrossingEdges { scanline: y + 1 });
        }
    }

    Ok(())
}
