//! A CPU software renderer for polygonal meshes.
//!
//! Meshes are kept as half-edge structures, viewed through an orbit camera
//! (orthographic or perspective), clipped to an inset viewport, and drawn as
//! wireframes or Phong-shaded filled faces into a z-buffered frame buffer.
//! Lines are rasterized with either DDA or Bresenham.
//!
//! # Quick Start
//!
//! ```ignore
//! use polyshade::prelude::*;
//!
//! let mut engine = Engine::new(800, 600);
//! engine.load_file("assets/pyramid.dat")?;
//! engine.set_coloring_mode(ColoringMode::FilledByVertex);
//! engine.render().save_png("pyramid.png")?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod clipper;
pub mod colors;
pub mod config;
pub mod engine;
pub mod light;
pub mod loader;
pub mod math;
pub mod mesh;
pub mod render;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use config::{ConfigError, RenderConfig};
pub use engine::{ColoringMode, Engine};
pub use mesh::{LoadError, Mesh, TopologyError};
pub use render::{FillError, FrameBuffer, RasterAlgorithm};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use polyshade::prelude::*;
/// ```
pub mod prelude {
    // Engine
    pub use crate::engine::{ColoringMode, Engine};

    // Scene
    pub use crate::camera::Camera;
    pub use crate::colors::Color;
    pub use crate::light::{LightModel, LightSource};
    pub use crate::mesh::Mesh;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    // Rendering
    pub use crate::render::{FrameBuffer, RasterAlgorithm};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipper::{clip_line, clip_polygon, clip_polygon_full, Viewport};
    pub use crate::render::rasterizer::{
        fill_polygon, fill_triangle, Bresenham, Dda, LineRasterizer,
    };
    pub use crate::render::{FrameBuffer, ScreenVertex};
}
