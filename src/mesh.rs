//! Half-edge mesh representation.
//!
//! # Structure
//!
//! - Every polygon side is a directed [`HalfEdge`] owned by one [`Face`]
//! - Half-edges store: origin vertex, face, next/prev around the face, and the
//!   opposite half-edge of the neighbouring face (`pair`, unset on boundaries)
//! - Vertices store handles of all their outgoing half-edges
//! - Faces store one representative half-edge on their boundary
//!
//! All entities live in arenas (`Vec`s) and refer to each other through typed
//! handles, so relationships are plain indices. Handles never shift after
//! construction, which also makes [`Clone`] a complete deep copy: the copied
//! arenas line up index for index with the source.
//!
//! # Winding
//!
//! Faces are expected to be wound counter-clockwise when seen from their
//! front side. Face normals follow that convention and inconsistent input is
//! not corrected.

use thiserror::Error;

use crate::colors::Color;
use crate::math::vec3::Vec3;

/// Handle of a vertex in a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

/// Handle of a face in a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(usize);

/// Handle of a half-edge in a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(usize);

macro_rules! impl_handle {
    ($($name:ident),*) => {$(
        impl $name {
            /// Position of the entity in its arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }
    )*};
}

impl_handle!(VertexId, FaceId, HalfEdgeId);

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Color,
    outgoing: Vec<HalfEdgeId>,
}

impl Vertex {
    /// Half-edges whose origin is this vertex.
    pub fn outgoing(&self) -> &[HalfEdgeId] {
        &self.outgoing
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    edge: HalfEdgeId,
    pub color: Color,
}

impl Face {
    /// The representative half-edge on this face's boundary.
    pub fn edge(&self) -> HalfEdgeId {
        self.edge
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    origin: VertexId,
    face: FaceId,
    next: HalfEdgeId,
    prev: HalfEdgeId,
    pair: Option<HalfEdgeId>,
}

impl HalfEdge {
    pub fn origin(&self) -> VertexId {
        self.origin
    }

    pub fn face(&self) -> FaceId {
        self.face
    }

    pub fn next(&self) -> HalfEdgeId {
        self.next
    }

    pub fn prev(&self) -> HalfEdgeId {
        self.prev
    }

    /// Opposite half-edge on the adjacent face, `None` on an open boundary.
    pub fn pair(&self) -> Option<HalfEdgeId> {
        self.pair
    }
}

/// Errors raised while turning points and polygons into a [`Mesh`].
///
/// Loading is all-or-nothing: when any of these is returned no mesh is
/// produced and the caller's previous mesh stays in place.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {token:?} is not a number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },

    #[error("polygon {polygon}: needs at least 3 vertices, got {count}")]
    TooFewVertices { polygon: usize, count: usize },

    #[error("polygon {polygon}: index {index} is out of range for {points} points")]
    IndexOutOfRange {
        polygon: usize,
        index: usize,
        points: usize,
    },

    #[error("polygon {polygon}: vertex {vertex} repeats on consecutive corners")]
    DegenerateEdge { polygon: usize, vertex: usize },

    #[error("polygon {polygon}: directed edge {from} -> {to} already belongs to a face")]
    DuplicateEdge {
        polygon: usize,
        from: usize,
        to: usize,
    },

    #[error("grid input needs a square number of points (at least 4), got {0}")]
    NonSquareGrid(usize),
}

/// A broken half-edge invariant found by [`Mesh::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("half-edge {0:?}: next.prev does not lead back")]
    BrokenPrevLink(HalfEdgeId),

    #[error("half-edge {0:?}: pair.pair does not lead back")]
    BrokenPair(HalfEdgeId),

    #[error("half-edge {0:?}: next walk leaves face {1:?}")]
    ForeignEdgeInCycle(HalfEdgeId, FaceId),

    #[error("face {0:?}: boundary walk does not close")]
    OpenCycle(FaceId),

    #[error("vertex {0:?}: lists an outgoing half-edge with another origin")]
    StrayOutgoing(VertexId),
}

/// A polygonal mesh with half-edge connectivity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    half_edges: Vec<HalfEdge>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mesh from points and polygons given as point indices.
    ///
    /// Each polygon becomes one face and one half-edge per side. A new
    /// half-edge `A -> B` is paired with an existing half-edge `B -> A`
    /// found among B's outgoing edges; edges without a partner are boundary
    /// edges. Every vertex starts out with `color`.
    pub fn from_polygons(
        points: &[Vec3],
        polygons: &[Vec<usize>],
        color: Color,
    ) -> Result<Self, LoadError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LoadError::NonFinitePoint { index });
        }

        let mut mesh = Mesh {
            vertices: points
                .iter()
                .map(|&position| Vertex {
                    position,
                    color,
                    outgoing: Vec::new(),
                })
                .collect(),
            faces: Vec::with_capacity(polygons.len()),
            half_edges: Vec::with_capacity(polygons.iter().map(Vec::len).sum()),
        };

        for (polygon_index, polygon) in polygons.iter().enumerate() {
            mesh.add_polygon(polygon_index, polygon, color)?;
        }

        log::debug!(
            "built mesh: {} vertices, {} faces, {} half-edges ({} on the boundary)",
            mesh.vertex_count(),
            mesh.face_count(),
            mesh.half_edge_count(),
            mesh.boundary_edge_count()
        );

        Ok(mesh)
    }

    fn add_polygon(
        &mut self,
        polygon_index: usize,
        polygon: &[usize],
        color: Color,
    ) -> Result<(), LoadError> {
        let sides = polygon.len();
        if sides < 3 {
            return Err(LoadError::TooFewVertices {
                polygon: polygon_index,
                count: sides,
            });
        }
        if let Some(&index) = polygon.iter().find(|&&i| i >= self.vertices.len()) {
            return Err(LoadError::IndexOutOfRange {
                polygon: polygon_index,
                index,
                points: self.vertices.len(),
            });
        }
        for j in 0..sides {
            if polygon[j] == polygon[(j + 1) % sides] {
                return Err(LoadError::DegenerateEdge {
                    polygon: polygon_index,
                    vertex: polygon[j],
                });
            }
        }

        let face = FaceId(self.faces.len());
        let base = self.half_edges.len();
        self.faces.push(Face {
            edge: HalfEdgeId(base),
            color,
        });

        // Cycle links first, so `next` is valid for every edge of this face
        // while pairing below.
        for (j, &origin) in polygon.iter().enumerate() {
            self.half_edges.push(HalfEdge {
                origin: VertexId(origin),
                face,
                next: HalfEdgeId(base + (j + 1) % sides),
                prev: HalfEdgeId(base + (j + sides - 1) % sides),
                pair: None,
            });
        }

        for j in 0..sides {
            let edge = HalfEdgeId(base + j);
            let from = VertexId(polygon[j]);
            let to = VertexId(polygon[(j + 1) % sides]);

            if self.find_half_edge(from, to).is_some() {
                return Err(LoadError::DuplicateEdge {
                    polygon: polygon_index,
                    from: from.0,
                    to: to.0,
                });
            }
            self.vertices[from.0].outgoing.push(edge);

            if let Some(opposite) = self.find_half_edge(to, from) {
                self.half_edges[edge.0].pair = Some(opposite);
                self.half_edges[opposite.0].pair = Some(edge);
            }
        }

        Ok(())
    }

    /// Finds the registered half-edge running `from -> to`.
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.vertices[from.0]
            .outgoing
            .iter()
            .copied()
            .find(|&e| self.destination(e) == to)
    }

    // ============ Counts & Access ============

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }

    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.0]
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn half_edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> {
        (0..self.half_edges.len()).map(HalfEdgeId)
    }

    /// Vertex positions indexed by [`VertexId::index`].
    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    // ============ Adjacency ============

    /// The vertex a half-edge points to (origin of its successor).
    #[inline]
    pub fn destination(&self, edge: HalfEdgeId) -> VertexId {
        let next = self.half_edges[edge.0].next;
        self.half_edges[next.0].origin
    }

    pub fn is_boundary(&self, edge: HalfEdgeId) -> bool {
        self.half_edges[edge.0].pair.is_none()
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.half_edges.iter().filter(|e| e.pair.is_none()).count()
    }

    /// Walks the boundary of `face` starting at its representative edge.
    pub fn face_half_edges(&self, face: FaceId) -> FaceEdges<'_> {
        let start = self.faces[face.0].edge;
        FaceEdges {
            mesh: self,
            start,
            current: Some(start),
        }
    }

    /// Corner vertices of `face` in boundary order.
    pub fn face_vertices(&self, face: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.face_half_edges(face)
            .map(move |e| self.half_edges[e.0].origin)
    }

    pub fn face_side_count(&self, face: FaceId) -> usize {
        self.face_half_edges(face).count()
    }

    /// Faces that have `vertex` as a corner.
    pub fn vertex_faces(&self, vertex: VertexId) -> impl Iterator<Item = FaceId> + '_ {
        self.vertices[vertex.0]
            .outgoing
            .iter()
            .map(move |e| self.half_edges[e.0].face)
    }

    // ============ Geometry ============

    /// Mean of the face corners, taking positions from `positions`.
    ///
    /// `positions` is indexed by vertex handle; pass a transformed copy of
    /// [`Mesh::positions`] to evaluate the face in another space.
    pub fn face_centroid_in(&self, face: FaceId, positions: &[Vec3]) -> Vec3 {
        let (sum, count) = self
            .face_vertices(face)
            .fold((Vec3::ZERO, 0usize), |(sum, n), v| (sum + positions[v.0], n + 1));
        if count == 0 {
            Vec3::ZERO
        } else {
            sum / count as f32
        }
    }

    /// Unit normal from the first two boundary edges: `(v1 - v0) x (v2 - v0)`.
    ///
    /// Counter-clockwise faces point their normal toward the viewer. A
    /// degenerate corner yields `Vec3::ZERO`.
    pub fn face_normal_in(&self, face: FaceId, positions: &[Vec3]) -> Vec3 {
        let e0 = self.faces[face.0].edge;
        let e1 = self.half_edges[e0.0].next;
        let e2 = self.half_edges[e1.0].next;
        let p0 = positions[self.half_edges[e0.0].origin.0];
        let p1 = positions[self.half_edges[e1.0].origin.0];
        let p2 = positions[self.half_edges[e2.0].origin.0];
        (p1 - p0).cross(p2 - p0).normalize()
    }

    /// Normalized sum of the normals of all faces around `vertex`.
    pub fn vertex_normal_in(&self, vertex: VertexId, positions: &[Vec3]) -> Vec3 {
        self.vertex_faces(vertex)
            .fold(Vec3::ZERO, |sum, f| sum + self.face_normal_in(f, positions))
            .normalize()
    }

    pub fn face_centroid(&self, face: FaceId) -> Vec3 {
        self.face_centroid_in(face, &self.positions())
    }

    pub fn face_normal(&self, face: FaceId) -> Vec3 {
        self.face_normal_in(face, &self.positions())
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for a mesh without vertices.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| {
                    (min.min(v.position), max.max(v.position))
                }),
        )
    }

    // ============ Mutation ============

    pub fn translate(&mut self, offset: Vec3) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scales every position about the origin.
    pub fn scale(&mut self, factor: f32) {
        for vertex in &mut self.vertices {
            vertex.position = vertex.position * factor;
        }
    }

    /// Moves the bounding-box center to the origin and returns the offset used.
    pub fn recenter(&mut self) -> Vec3 {
        let Some((min, max)) = self.bounding_box() else {
            return Vec3::ZERO;
        };
        let offset = -((min + max) * 0.5);
        self.translate(offset);
        offset
    }

    /// Uniformly scales the mesh so its largest extent equals `size`.
    ///
    /// Flat or empty meshes (zero extent) are left untouched.
    pub fn fit_to(&mut self, size: f32) {
        let Some((min, max)) = self.bounding_box() else {
            return;
        };
        let extent = (max - min).max_element();
        if extent > f32::EPSILON && size > 0.0 {
            self.scale(size / extent);
        }
    }

    /// Recolors every vertex and face.
    pub fn set_color(&mut self, color: Color) {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
        for face in &mut self.faces {
            face.color = color;
        }
    }

    pub fn set_face_color(&mut self, face: FaceId, color: Color) {
        self.faces[face.0].color = color;
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.half_edges.clear();
    }

    // ============ Invariants ============

    /// Checks every half-edge invariant and reports the first violation.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for id in self.half_edge_ids() {
            let edge = self.half_edges[id.0];
            if self.half_edges[edge.next.0].prev != id {
                return Err(TopologyError::BrokenPrevLink(id));
            }
            if let Some(pair) = edge.pair {
                if self.half_edges[pair.0].pair != Some(id) {
                    return Err(TopologyError::BrokenPair(id));
                }
            }
        }

        for face in self.face_ids() {
            let start = self.faces[face.0].edge;
            let mut edge = start;
            let mut steps = 0;
            loop {
                if self.half_edges[edge.0].face != face {
                    return Err(TopologyError::ForeignEdgeInCycle(edge, face));
                }
                edge = self.half_edges[edge.0].next;
                steps += 1;
                if edge == start {
                    break;
                }
                if steps > self.half_edges.len() {
                    return Err(TopologyError::OpenCycle(face));
                }
            }
        }

        for id in self.vertex_ids() {
            if self.vertices[id.0]
                .outgoing
                .iter()
                .any(|e| self.half_edges[e.0].origin != id)
            {
                return Err(TopologyError::StrayOutgoing(id));
            }
        }

        Ok(())
    }
}

/// Iterator over the half-edges around one face, following `next`.
pub struct FaceEdges<'a> {
    mesh: &'a Mesh,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
}

impl Iterator for FaceEdges<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.current?;
        let next = self.mesh.half_edges[edge.0].next;
        self.current = (next != self.start).then_some(next);
        Some(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit cube with counter-clockwise outward faces (quads).
    fn cube() -> (Vec<Vec3>, Vec<Vec<usize>>) {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let polygons = vec![
            vec![0, 3, 2, 1], // z = 0, facing -z
            vec![4, 5, 6, 7], // z = 1, facing +z
            vec![0, 1, 5, 4], // y = 0
            vec![2, 3, 7, 6], // y = 1
            vec![1, 2, 6, 5], // x = 1
            vec![0, 4, 7, 3], // x = 0
        ];
        (points, polygons)
    }

    fn two_triangles() -> Mesh {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::from_polygons(&points, &[vec![0, 1, 2], vec![0, 2, 3]], Color::BLUE).unwrap()
    }

    #[test]
    fn closed_cube_pairs_every_edge() {
        let (points, polygons) = cube();
        let mesh = Mesh::from_polygons(&points, &polygons, Color::BLUE).unwrap();

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.half_edge_count(), 24);
        assert_eq!(mesh.boundary_edge_count(), 0);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn shared_diagonal_is_paired_and_rest_is_boundary() {
        let mesh = two_triangles();
        assert_eq!(mesh.boundary_edge_count(), 4);

        let diagonal = mesh
            .find_half_edge(VertexId(2), VertexId(0))
            .expect("edge 2 -> 0 exists");
        let opposite = mesh.half_edge(diagonal).pair().expect("diagonal is paired");
        assert_eq!(mesh.half_edge(opposite).origin(), VertexId(0));
        assert_eq!(mesh.half_edge(opposite).pair(), Some(diagonal));
    }

    #[test]
    fn face_walk_closes_after_side_count() {
        let (points, polygons) = cube();
        let mesh = Mesh::from_polygons(&points, &polygons, Color::BLUE).unwrap();
        for face in mesh.face_ids() {
            assert_eq!(mesh.face_side_count(face), 4);
            let start = mesh.face(face).edge();
            let mut edge = start;
            for _ in 0..4 {
                edge = mesh.half_edge(edge).next();
            }
            assert_eq!(edge, start);
        }
    }

    #[test]
    fn deep_copy_preserves_topology() {
        let (points, polygons) = cube();
        let mesh = Mesh::from_polygons(&points, &polygons, Color::BLUE).unwrap();
        let mut copy = mesh.clone();

        assert_eq!(copy.validate(), Ok(()));
        for id in copy.half_edge_ids() {
            let pair = copy.half_edge(id).pair().unwrap();
            assert_eq!(copy.half_edge(pair).pair(), Some(id));
        }
        for face in mesh.face_ids() {
            assert_eq!(copy.face_side_count(face), mesh.face_side_count(face));
        }

        // Mutating the copy leaves the source alone.
        copy.translate(Vec3::ONE);
        assert_eq!(mesh.vertex(VertexId(0)).position, Vec3::ZERO);
    }

    #[test]
    fn empty_mesh_copies_to_empty_mesh() {
        let mesh = Mesh::new();
        let copy = mesh.clone();
        assert!(copy.is_empty());
        assert_eq!(copy.validate(), Ok(()));
        assert_eq!(copy.bounding_box(), None);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let points = vec![Vec3::ZERO, Vec3::ONE, Vec3::UP];
        let err = Mesh::from_polygons(&points, &[vec![0, 1, 7]], Color::BLUE).unwrap_err();
        assert!(matches!(
            err,
            LoadError::IndexOutOfRange { polygon: 0, index: 7, points: 3 }
        ));
    }

    #[test]
    fn short_polygon_is_rejected() {
        let points = vec![Vec3::ZERO, Vec3::ONE];
        let err = Mesh::from_polygons(&points, &[vec![0, 1]], Color::BLUE).unwrap_err();
        assert!(matches!(err, LoadError::TooFewVertices { count: 2, .. }));
    }

    #[test]
    fn repeated_directed_edge_is_rejected() {
        let points = vec![Vec3::ZERO, Vec3::ONE, Vec3::UP, Vec3::FORWARD];
        let err =
            Mesh::from_polygons(&points, &[vec![0, 1, 2], vec![0, 1, 3]], Color::BLUE).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateEdge { from: 0, to: 1, .. }));
    }

    #[test]
    fn counter_clockwise_face_normal_points_toward_viewer() {
        let mesh = two_triangles();
        let normal = mesh.face_normal(FaceId(0));
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn vertex_normal_averages_incident_faces() {
        let (points, polygons) = cube();
        let mesh = Mesh::from_polygons(&points, &polygons, Color::BLUE).unwrap();
        let corner = mesh.vertex_normal_in(VertexId(6), &mesh.positions());
        let expected = 1.0 / 3.0_f32.sqrt();
        assert_relative_eq!(corner.x, expected, epsilon = 1e-5);
        assert_relative_eq!(corner.y, expected, epsilon = 1e-5);
        assert_relative_eq!(corner.z, expected, epsilon = 1e-5);
    }

    #[test]
    fn recenter_and_fit_normalize_bounds() {
        let (points, polygons) = cube();
        let mut mesh = Mesh::from_polygons(&points, &polygons, Color::BLUE).unwrap();
        mesh.recenter();
        mesh.fit_to(100.0);

        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min.x, -50.0, epsilon = 1e-4);
        assert_relative_eq!(max.z, 50.0, epsilon = 1e-4);
        assert_relative_eq!(mesh.face_centroid(FaceId(1)).z, 50.0, epsilon = 1e-4);
    }

    #[test]
    fn set_color_recolors_vertices_and_faces() {
        let mut mesh = two_triangles();
        mesh.set_color(Color::RED);
        assert!(mesh.vertices().iter().all(|v| v.color == Color::RED));
        assert!(mesh.faces().iter().all(|f| f.color == Color::RED));
    }
}
