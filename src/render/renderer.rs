//! Per-frame rendering pipeline.
//!
//! Provides [`render_scene`], which takes a mesh from world space to pixels:
//!
//! 1. view transform (camera)
//! 2. Phong colors, evaluated in view space (per face via [`shade_faces`],
//!    which stores them in the mesh; per vertex here)
//! 3. projection and viewport centering
//! 4. per face: polygon clip, then scanline fill (or per edge: line clip,
//!    then line drawing for wireframes)
//!
//! The frame buffer is not cleared here; callers clear it before a frame.

use serde::{Deserialize, Serialize};

use super::framebuffer::FrameBuffer;
use super::rasterizer::{LineRasterizer, RasterizerDispatcher};
use super::shader::PhongShader;
use super::vertex::ScreenVertex;
use crate::camera::Camera;
use crate::clipper::{clip_line, clip_polygon, Viewport};
use crate::colors::Color;
use crate::light::{LightModel, LightSource};
use crate::math::vec3::Vec3;
use crate::mesh::{FaceId, Mesh};
use crate::transform::{project, to_view_space};

/// How faces are turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColoringMode {
    /// Edges only, drawn in the colors of their end vertices.
    #[default]
    Wireframe,
    /// One Phong color per face, evaluated at the face centroid.
    FilledBySide,
    /// Phong colors at the vertices (vertex normals), interpolated across faces.
    FilledByVertex,
}

impl std::fmt::Display for ColoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColoringMode::Wireframe => write!(f, "wireframe"),
            ColoringMode::FilledBySide => write!(f, "filled by side"),
            ColoringMode::FilledByVertex => write!(f, "filled by vertex"),
        }
    }
}

/// Everything a frame reads, borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub mesh: &'a Mesh,
    pub camera: &'a Camera,
    pub light: &'a LightSource,
    pub light_model: &'a LightModel,
    pub mode: ColoringMode,
}

/// Counters collected while rendering one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Faces or edges that reached the rasterizer.
    pub primitives_drawn: usize,
    /// Faces or edges removed entirely by clipping.
    pub clipped_away: usize,
    /// Faces or edges dropped because a vertex could not be projected.
    pub unprojectable: usize,
    /// Faces abandoned because of a fill error.
    pub fill_errors: usize,
}

/// Renders `scene` into `buffer` through the active line algorithm.
pub fn render_scene(
    scene: &Scene<'_>,
    rasterizer: &RasterizerDispatcher,
    viewport: &Viewport,
    buffer: &mut FrameBuffer,
) -> FrameStats {
    let mut stats = FrameStats::default();
    if scene.mesh.is_empty() || buffer.is_empty() || viewport.is_empty() {
        return stats;
    }

    let view = to_view_space(scene.mesh, scene.camera);
    let screen = project(&view, scene.camera, buffer.width(), buffer.height());

    match scene.mode {
        ColoringMode::Wireframe => {
            draw_edges(scene.mesh, &screen, rasterizer, viewport, buffer, &mut stats)
        }
        ColoringMode::FilledBySide => {
            for face in scene.mesh.face_ids() {
                let color = scene.mesh.face(face).color;
                let polygon = face_polygon(scene.mesh, face, &screen, |_| color);
                fill_face(face, polygon, rasterizer, viewport, buffer, &mut stats);
            }
        }
        ColoringMode::FilledByVertex => {
            let shader = PhongShader::new(scene.light, scene.light_model, scene.camera);
            let colors: Vec<Color> = scene
                .mesh
                .vertex_ids()
                .map(|v| shader.shade(view[v.index()], scene.mesh.vertex_normal_in(v, &view)))
                .collect();
            for face in scene.mesh.face_ids() {
                let polygon = face_polygon(scene.mesh, face, &screen, |i| colors[i]);
                fill_face(face, polygon, rasterizer, viewport, buffer, &mut stats);
            }
        }
    }

    log::trace!(
        "{} frame: {} drawn, {} clipped away, {} unprojectable, {} fill errors",
        scene.mode,
        stats.primitives_drawn,
        stats.clipped_away,
        stats.unprojectable,
        stats.fill_errors
    );
    stats
}

/// Stores each face's Phong color, evaluated at its centroid, in the face.
///
/// [`ColoringMode::FilledBySide`] draws faces in their stored colors, so this
/// runs before [`render_scene`] whenever the camera, light, or mesh changed.
pub fn shade_faces(mesh: &mut Mesh, camera: &Camera, light: &LightSource, model: &LightModel) {
    let view = to_view_space(mesh, camera);
    let shader = PhongShader::new(light, model, camera);
    let colors: Vec<(FaceId, Color)> = mesh
        .face_ids()
        .map(|face| {
            let color = shader.shade(
                mesh.face_centroid_in(face, &view),
                mesh.face_normal_in(face, &view),
            );
            (face, color)
        })
        .collect();
    for (face, color) in colors {
        mesh.set_face_color(face, color);
    }
}

/// Screen-space corners of a face, or `None` when one is unprojectable.
fn face_polygon(
    mesh: &Mesh,
    face: FaceId,
    screen: &[Option<Vec3>],
    color_of: impl Fn(usize) -> Color,
) -> Option<Vec<ScreenVertex>> {
    mesh.face_vertices(face)
        .map(|v| {
            let p = screen[v.index()]?;
            Some(ScreenVertex::new(p.x, p.y, p.z, color_of(v.index())))
        })
        .collect()
}

fn fill_face(
    face: FaceId,
    polygon: Option<Vec<ScreenVertex>>,
    rasterizer: &RasterizerDispatcher,
    viewport: &Viewport,
    buffer: &mut FrameBuffer,
    stats: &mut FrameStats,
) {
    let Some(polygon) = polygon else {
        stats.unprojectable += 1;
        return;
    };

    let clipped = clip_polygon(&polygon, viewport);
    if clipped.is_empty() {
        stats.clipped_away += 1;
        return;
    }

    match rasterizer.fill(&clipped, buffer) {
        Ok(()) => stats.primitives_drawn += 1,
        Err(err) => {
            log::warn!("face {}: {err}; skipped", face.index());
            stats.fill_errors += 1;
        }
    }
}

/// Draws every undirected edge once, in its vertex colors.
fn draw_edges(
    mesh: &Mesh,
    screen: &[Option<Vec3>],
    rasterizer: &RasterizerDispatcher,
    viewport: &Viewport,
    buffer: &mut FrameBuffer,
    stats: &mut FrameStats,
) {
    for id in mesh.half_edge_ids() {
        if matches!(mesh.half_edge(id).pair(), Some(pair) if pair < id) {
            continue;
        }

        let from = mesh.half_edge(id).origin();
        let to = mesh.destination(id);
        let (Some(a), Some(b)) = (screen[from.index()], screen[to.index()]) else {
            stats.unprojectable += 1;
            continue;
        };

        let a = ScreenVertex::new(a.x, a.y, a.z, mesh.vertex(from).color);
        let b = ScreenVertex::new(b.x, b.y, b.z, mesh.vertex(to).color);
        match clip_line(&a, &b, viewport) {
            Some((p, q)) => {
                rasterizer.draw_line(&p, &q, buffer);
                stats.primitives_drawn += 1;
            }
            None => stats.clipped_away += 1,
        }
    }
}
