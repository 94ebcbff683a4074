//! Line and polygon rasterization.
//!
//! Two interchangeable line algorithms are available and can be swapped at
//! runtime:
//! - [`Dda`]: floating-point slope stepping
//! - [`Bresenham`]: integer error-term stepping
//!
//! Both walk a segment with increasing major coordinate and plot exactly the
//! same pixels for the same integer endpoints. Polygon filling
//! ([`scanline`]) draws every span through the active line algorithm, so
//! every pixel write of the renderer goes through one depth-tested path.

mod bresenham;
mod dda;
pub mod scanline;

pub use bresenham::Bresenham;
pub use dda::Dda;
pub use scanline::{fill_polygon, fill_triangle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::framebuffer::FrameBuffer;
use super::vertex::ScreenVertex;

/// Errors raised while filling one polygon.
///
/// The renderer logs these and moves on to the next face.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FillError {
    #[error("scanline {scanline}: odd number of active edges ({count})")]
    OddActiveEdges { scanline: i32, count: usize },

    #[error("scanline {scanline}: active edges cross (self-intersecting polygon)")]
    CrossingEdges { scanline: i32 },
}

/// Rounds to the nearest pixel, halves toward +infinity.
///
/// The tolerance absorbs accumulated floating-point error so exact halves
/// reached by repeated addition still round up.
#[inline]
pub(crate) fn round_half_up(v: f64) -> i32 {
    (v + 0.5 + 1e-9).floor() as i32
}

#[inline]
pub(crate) fn to_pixel(v: f32) -> i32 {
    round_half_up(v as f64)
}

/// A segment reoriented so its major coordinate increases.
///
/// Coordinates are stored as `(major, minor)`: `(x, y)` for x-major walks
/// (`|dy| < |dx|`), `(y, x)` otherwise.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MajorWalk {
    pub major: i32,
    pub minor: i32,
    /// Length along the major axis, always positive.
    pub steps: i32,
    /// Signed minor-axis travel.
    pub minor_delta: i32,
    x_major: bool,
    swapped: bool,
}

impl MajorWalk {
    /// Returns `None` for a zero-length segment.
    pub fn new(from: (i32, i32), to: (i32, i32)) -> Option<Self> {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        if dx == 0 && dy == 0 {
            return None;
        }

        let x_major = dy.abs() < dx.abs();
        let (a, b) = if x_major {
            (from, to)
        } else {
            ((from.1, from.0), (to.1, to.0))
        };
        let swapped = b.0 < a.0;
        let (start, end) = if swapped { (b, a) } else { (a, b) };

        Some(Self {
            major: start.0,
            minor: start.1,
            steps: end.0 - start.0,
            minor_delta: end.1 - start.1,
            x_major,
            swapped,
        })
    }

    /// Maps a `(major, minor)` pair back to `(x, y)`.
    #[inline]
    pub fn pixel(&self, major: i32, minor: i32) -> (i32, i32) {
        if self.x_major {
            (major, minor)
        } else {
            (minor, major)
        }
    }

    /// Interpolation parameter of step `k`, measured from the caller's `from`.
    #[inline]
    pub fn param(&self, k: i32) -> f32 {
        let t = k as f32 / self.steps as f32;
        if self.swapped {
            1.0 - t
        } else {
            t
        }
    }
}

/// Trait for line drawing algorithms.
///
/// Implementors only decide which pixels a segment covers; attribute
/// interpolation and the depth test are shared by [`LineRasterizer::draw_line`].
pub trait LineRasterizer {
    /// Visits every pixel of the segment between two integer endpoints.
    ///
    /// `plot` receives `(x, y, t)` where `t` is the position along the segment
    /// measured from `from` (0) to `to` (1). A zero-length segment plots nothing.
    fn trace(&self, from: (i32, i32), to: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32));

    /// Draws a depth-tested segment with linearly interpolated depth and color.
    ///
    /// # Arguments
    /// * `a`, `b` - Endpoints in screen space; x/y are rounded to pixels
    /// * `buffer` - The frame buffer to draw into
    fn draw_line(&self, a: &ScreenVertex, b: &ScreenVertex, buffer: &mut FrameBuffer) {
        let from = (to_pixel(a.x), to_pixel(a.y));
        let to = (to_pixel(b.x), to_pixel(b.y));
        self.trace(from, to, &mut |x, y, t| {
            let depth = a.depth + (b.depth - a.depth) * t;
            let color = a.color.lerp(b.color, t).to_argb();
            buffer.set_pixel_with_depth(x, y, depth, color);
        });
    }
}

/// Available line drawing algorithms.
///
/// Can be changed at runtime via `Engine::set_raster_algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterAlgorithm {
    /// Digital differential analyzer: floating-point slope stepping.
    #[default]
    Dda,
    /// Integer error-term stepping.
    Bresenham,
}

impl std::fmt::Display for RasterAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterAlgorithm::Dda => write!(f, "DDA"),
            RasterAlgorithm::Bresenham => write!(f, "Bresenham"),
        }
    }
}

/// Holds both line algorithms and forwards to the active one.
#[derive(Debug, Clone, Default)]
pub struct RasterizerDispatcher {
    dda: Dda,
    bresenham: Bresenham,
    active: RasterAlgorithm,
}

impl RasterizerDispatcher {
    pub fn new(algorithm: RasterAlgorithm) -> Self {
        Self {
            dda: Dda,
            bresenham: Bresenham,
            active: algorithm,
        }
    }

    pub fn set_algorithm(&mut self, algorithm: RasterAlgorithm) {
        self.active = algorithm;
    }

    pub fn algorithm(&self) -> RasterAlgorithm {
        self.active
    }

    /// Fills a screen-space polygon: triangles by splitting into flat halves,
    /// larger polygons with an active edge table.
    pub fn fill(
        &self,
        polygon: &[ScreenVertex],
        buffer: &mut FrameBuffer,
    ) -> Result<(), FillError> {
        match polygon {
            [a, b, c] => {
                fill_triangle([*a, *b, *c], self, buffer);
                Ok(())
            }
            _ if polygon.len() > 3 => fill_polygon(polygon, self, buffer),
            _ => Ok(()),
        }
    }
}

impl LineRasterizer for RasterizerDispatcher {
    #[inline]
    fn trace(&self, from: (i32, i32), to: (i32, i32), plot: &mut dyn FnMut(i32, i32, f32)) {
        match self.active {
            RasterAlgorithm::Dda => self.dda.trace(from, to, plot),
            RasterAlgorithm::Bresenham => self.bresenham.trace(from, to, plot),
        }
    }
}
