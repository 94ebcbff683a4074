//! Core rendering engine.
//!
//! The [`Engine`] is the render session: it owns the mesh, camera, light,
//! light model, coloring mode, raster algorithm, global color, and frame
//! buffer, and exposes every operation a display shell needs. A shell
//! forwards user intent through the setters and calls [`Engine::render`]
//! to get a finished frame.
//!
//! ```ignore
//! let mut engine = Engine::new(800, 600);
//! engine.load_file("assets/pyramid.dat")?;
//! engine.set_coloring_mode(ColoringMode::FilledBySide);
//! engine.rotate_camera(0.3, 0.2);
//! let frame = engine.render();
//! frame.save_png("out.png")?;
//! ```

use std::path::Path;

use crate::camera::Camera;
use crate::clipper::{Viewport, DEFAULT_MARGIN};
use crate::colors::{self, Color};
use crate::config::RenderConfig;
use crate::light::{clamp_intensity, LightModel, LightSource};
use crate::loader::{self, MeshData};
use crate::math::vec3::Vec3;
use crate::mesh::{LoadError, Mesh};
use crate::render::framebuffer::FrameBuffer;
use crate::render::rasterizer::{RasterAlgorithm, RasterizerDispatcher};
use crate::render::renderer::{render_scene, shade_faces, FrameStats, Scene};

pub use crate::render::renderer::ColoringMode;

const DEFAULT_FIT_FRACTION: f32 = 0.8;

pub struct Engine {
    mesh: Mesh,
    camera: Camera,
    light: LightSource,
    light_model: LightModel,
    coloring_mode: ColoringMode,
    rasterizer: RasterizerDispatcher,
    global_color: Color,
    frame: FrameBuffer,
    margin: usize,
    fit_fraction: f32,
    last_stats: FrameStats,
}

impl Engine {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            mesh: Mesh::new(),
            camera: Camera::default(),
            light: LightSource::default(),
            light_model: LightModel::default(),
            coloring_mode: ColoringMode::default(),
            rasterizer: RasterizerDispatcher::new(RasterAlgorithm::default()),
            global_color: Color::default(),
            frame: FrameBuffer::with_background(width, height, colors::BACKGROUND),
            margin: DEFAULT_MARGIN,
            fit_fraction: DEFAULT_FIT_FRACTION,
            last_stats: FrameStats::default(),
        }
    }

    /// Creates a session seeded from a configuration.
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut engine = Self::new(config.width, config.height);
        engine.frame.set_background(config.background);
        engine.frame.clear();
        engine.margin = config.margin;
        engine.fit_fraction = config.fit_fraction;
        engine.global_color = config.global_color;
        engine.coloring_mode = config.coloring_mode;
        engine.rasterizer.set_algorithm(config.raster_algorithm);
        engine.camera = config.camera.to_camera();
        engine.light = config.light.to_light();
        engine.light_model = config.light_model;
        log::info!(
            "engine {}x{}: {} via {}",
            config.width,
            config.height,
            config.coloring_mode,
            config.raster_algorithm
        );
        engine
    }

    // ============ Mesh ============

    /// Builds a mesh from points and polygons and makes it current.
    ///
    /// The mesh is recentered on the origin and, when a fit fraction is set,
    /// scaled to fit the viewport. On error the previous mesh is kept.
    pub fn load_mesh(&mut self, points: &[Vec3], polygons: &[Vec<usize>]) -> Result<(), LoadError> {
        let mut mesh = Mesh::from_polygons(points, polygons, self.global_color)?;
        mesh.recenter();

        let viewport = self.viewport();
        let side = (viewport.max.x - viewport.min.x).min(viewport.max.y - viewport.min.y);
        if self.fit_fraction > 0.0 && side > 0.0 {
            mesh.fit_to(side * self.fit_fraction);
        }

        log::info!(
            "loaded mesh: {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        );
        self.mesh = mesh;
        Ok(())
    }

    pub fn load_data(&mut self, data: &MeshData) -> Result<(), LoadError> {
        self.load_mesh(&data.points, &data.polygons)
    }

    /// Reads a grid or tagged mesh file (see [`crate::loader`]).
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        self.load_data(&loader::load_file(path)?)
    }

    pub fn load_str(&mut self, text: &str) -> Result<(), LoadError> {
        self.load_data(&loader::parse_mesh_str(text)?)
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    // ============ Camera ============

    /// Sets camera position, angles (radians), and projection distance
    /// (`0` = orthographic). The zoom factor is kept.
    pub fn set_camera(
        &mut self,
        position: Vec3,
        zenith: f32,
        azimuth: f32,
        center_of_projection: f32,
    ) {
        if !(position.is_finite() && zenith.is_finite() && azimuth.is_finite())
            || !center_of_projection.is_finite()
        {
            log::warn!("ignoring non-finite camera parameters");
            return;
        }
        self.camera.set(position, zenith, azimuth, center_of_projection);
    }

    /// Adds angle deltas (radians) to the camera's zenith and azimuth.
    pub fn rotate_camera(&mut self, d_zenith: f32, d_azimuth: f32) {
        if !(d_zenith.is_finite() && d_azimuth.is_finite()) {
            log::warn!("ignoring non-finite camera rotation");
            return;
        }
        self.camera.rotate(d_zenith, d_azimuth);
    }

    /// Multiplies the camera zoom.
    pub fn scale_camera(&mut self, factor: f32) {
        if !self.camera.scale(factor) {
            log::warn!("ignoring camera scale factor {factor}");
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    // ============ Light ============

    pub fn set_light(&mut self, light: LightSource) {
        self.light = LightSource::new(light.position, light.color, light.intensity);
    }

    pub fn set_light_position(&mut self, position: Vec3) {
        self.light.position = position;
    }

    pub fn set_light_color(&mut self, color: Color) {
        self.light.color = color;
    }

    /// Sets the light intensity, clamped into `[0, 255]`.
    pub fn set_light_intensity(&mut self, intensity: f32) {
        let clamped = clamp_intensity(intensity);
        if clamped != intensity {
            log::warn!("light intensity {intensity} clamped to {clamped}");
        }
        self.light.intensity = clamped;
    }

    pub fn set_light_model(&mut self, model: LightModel) {
        self.light_model = model;
    }

    pub fn light(&self) -> &LightSource {
        &self.light
    }

    pub fn light_model(&self) -> &LightModel {
        &self.light_model
    }

    // ============ Appearance ============

    pub fn set_coloring_mode(&mut self, mode: ColoringMode) {
        self.coloring_mode = mode;
    }

    pub fn coloring_mode(&self) -> ColoringMode {
        self.coloring_mode
    }

    pub fn set_raster_algorithm(&mut self, algorithm: RasterAlgorithm) {
        self.rasterizer.set_algorithm(algorithm);
    }

    pub fn raster_algorithm(&self) -> RasterAlgorithm {
        self.rasterizer.algorithm()
    }

    /// Sets the base color and recolors every vertex and face of the mesh.
    pub fn set_global_color(&mut self, color: Color) {
        self.global_color = color;
        self.mesh.set_color(color);
    }

    pub fn global_color(&self) -> Color {
        self.global_color
    }

    pub fn set_background(&mut self, color: Color) {
        self.frame.set_background(color);
    }

    pub fn set_margin(&mut self, margin: usize) {
        self.margin = margin;
    }

    /// Clip rectangle for the current frame size.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_size(self.frame.width(), self.frame.height(), self.margin)
    }

    // ============ Frame ============

    /// Clears the frame buffer and renders the current mesh into it.
    ///
    /// In [`ColoringMode::FilledBySide`] the per-face Phong colors are
    /// stored in the mesh's faces first.
    pub fn render(&mut self) -> &FrameBuffer {
        self.frame.clear();
        if self.coloring_mode == ColoringMode::FilledBySide {
            shade_faces(&mut self.mesh, &self.camera, &self.light, &self.light_model);
        }
        let scene = Scene {
            mesh: &self.mesh,
            camera: &self.camera,
            light: &self.light,
            light_model: &self.light_model,
            mode: self.coloring_mode,
        };
        let viewport = self.viewport();
        self.last_stats = render_scene(&scene, &self.rasterizer, &viewport, &mut self.frame);
        &self.frame
    }

    /// Reallocates the frame buffer; takes effect on the next render.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.frame.resize(width, height);
        log::info!("resized frame to {width}x{height}");
    }

    /// Drops the mesh and clears the frame.
    pub fn clear(&mut self) {
        self.mesh.clear();
        self.frame.clear();
        self.last_stats = FrameStats::default();
    }

    /// Clears only the frame's pixels and depth.
    pub fn clear_frame(&mut self) {
        self.frame.clear();
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Counters from the most recent [`Engine::render`].
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}
