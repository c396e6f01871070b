//! Indexed triangle surface mesh.

use nalgebra::{Point3, Vector3};

/// An indexed triangle mesh in millimeter coordinates.
///
/// Vertices are stored as 32-bit floats and faces as 32-bit indices, the
/// normalized interchange representation used throughout the pipeline.
/// Faces use counter-clockwise winding when viewed from outside, so
/// [`SurfaceMesh::signed_volume`] is positive for a closed, outward-facing
/// surface.
///
/// Smoothing never touches faces: a smoothed variant of a mesh shares the
/// face list and differs only in vertex positions (see
/// [`SurfaceMesh::with_vertices`]).
///
/// # Example
///
/// ```
/// use mask_types::SurfaceMesh;
/// use nalgebra::Point3;
///
/// let mut mesh = SurfaceMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Vertex positions in millimeters.
    pub vertices: Vec<Point3<f32>>,

    /// Triangle faces as 0-based indices into the vertex list.
    pub faces: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f32>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangle faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// A mesh with the same faces and replacement vertex positions.
    ///
    /// The replacement buffer must have the same length and ordering as the
    /// existing vertices; face indices are reused as-is.
    #[must_use]
    pub fn with_vertices(&self, vertices: Vec<Point3<f32>>) -> Self {
        debug_assert_eq!(vertices.len(), self.vertices.len());
        Self {
            vertices,
            faces: self.faces.clone(),
        }
    }

    /// True when every face index is within `[0, vertex_count)`.
    #[must_use]
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.vertices.len();
        self.faces
            .iter()
            .all(|f| f.iter().all(|&i| (i as usize) < n))
    }

    /// Signed volume of the mesh via the divergence theorem: the sum of
    /// signed tetrahedra formed by each face and the origin.
    ///
    /// Positive for a closed mesh with outward-facing (CCW) winding,
    /// negative for an inside-out mesh, near-zero for open surfaces.
    /// Accumulated in `f64` for stability.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0_f64;

        for &[i0, i1, i2] in &self.faces {
            let v0 = self.vertices[i0 as usize].coords.cast::<f64>();
            let v1 = self.vertices[i1 as usize].coords.cast::<f64>();
            let v2 = self.vertices[i2 as usize].coords.cast::<f64>();
            volume += v0.dot(&v1.cross(&v2));
        }

        volume / 6.0
    }

    /// Absolute enclosed volume.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Centroid of the vertex positions, or the origin for an empty mesh.
    #[must_use]
    pub fn vertex_centroid(&self) -> Point3<f32> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum: Vector3<f32> = self.vertices.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.vertices.len() as f32)
    }
}
