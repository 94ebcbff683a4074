//! Rasterization back end: frame buffer, line and polygon rasterizers,
//! Phong shading, and the per-frame pipeline.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;
pub mod shader;
pub mod vertex;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{FillError, LineRasterizer, RasterAlgorithm, RasterizerDispatcher};
pub use renderer::{ColoringMode, FrameStats};
pub use vertex::ScreenVertex;
