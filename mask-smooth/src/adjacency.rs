//! Vertex-adjacency graph derived from triangle faces.

/// Degree floor used when normalizing neighbor sums, so isolated vertices
/// (degree 0) never divide by zero.
pub(crate) const DEGREE_EPSILON: f32 = 1e-8;

/// Undirected vertex adjacency of a triangle mesh.
///
/// For each face `(a, b, c)` the edges `(a,b)`, `(b,c)` and `(a,c)` are
/// registered in both directions; duplicates (an edge shared by several
/// faces, or appearing in both orientations) collapse to a single neighbor
/// relation. Construction is linear in face count plus a per-vertex
/// sort-and-dedup, never quadratic in vertex count.
///
/// The graph is ephemeral: the smoothing engine builds it once per call and
/// reuses it across all iterations, since relaxation moves positions but
/// never changes topology.
///
/// # Example
///
/// ```
/// use mask_smooth::VertexAdjacency;
///
/// let faces = [[0_u32, 1, 2]];
/// let adjacency = VertexAdjacency::from_faces(&faces, 3);
///
/// assert_eq!(adjacency.degree(0), 2);
/// assert_eq!(adjacency.neighbors(0), &[1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct VertexAdjacency {
    neighbors: Vec<Vec<u32>>,
    inv_degree: Vec<f32>,
}

impl VertexAdjacency {
    /// Build the adjacency graph for `vertex_count` vertices from a
    /// triangle face list.
    ///
    /// Vertices referenced by no face are legal and get an empty neighbor
    /// list; their inverse degree uses the epsilon floor.
    #[must_use]
    pub fn from_faces(faces: &[[u32; 3]], vertex_count: usize) -> Self {
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];

        for &[a, b, c] in faces {
            for (u, v) in [(a, b), (b, c), (a, c)] {
                if u == v {
                    continue;
                }
                if (u as usize) < vertex_count && (v as usize) < vertex_count {
                    neighbors[u as usize].push(v);
                    neighbors[v as usize].push(u);
                }
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        let inv_degree = neighbors
            .iter()
            .map(|list| 1.0 / (list.len() as f32).max(DEGREE_EPSILON))
            .collect();

        Self {
            neighbors,
            inv_degree,
        }
    }

    /// Number of vertices in the graph.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbor indices of vertex `v`, sorted ascending.
    #[must_use]
    pub fn neighbors(&self, v: usize) -> &[u32] {
        &self.neighbors[v]
    }

    /// Degree (neighbor count) of vertex `v`.
    #[must_use]
    pub fn degree(&self, v: usize) -> usize {
        self.neighbors[v].len()
    }

    /// `1 / max(degree, epsilon)` for vertex `v`.
    #[must_use]
    pub fn inv_degree(&self, v: usize) -> f32 {
        self.inv_degree[v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_every_vertex_has_degree_two() {
        let faces = [[0_u32, 1, 2]];
        let adjacency = VertexAdjacency::from_faces(&faces, 3);

        for v in 0..3 {
            assert_eq!(adjacency.degree(v), 2, "vertex {v}");
        }
    }

    #[test]
    fn shared_edge_counts_once() {
        // Two triangles sharing edge (1,2): 4 vertices.
        let faces = [[0_u32, 1, 2], [1, 3, 2]];
        let adjacency = VertexAdjacency::from_faces(&faces, 4);

        // Shared vertices see all three others; unshared see two.
        assert_eq!(adjacency.degree(1), 3);
        assert_eq!(adjacency.degree(2), 3);
        assert_eq!(adjacency.degree(0), 2);
        assert_eq!(adjacency.degree(3), 2);
    }

    #[test]
    fn both_orientations_collapse() {
        let faces = [[0_u32, 1, 2], [2, 1, 0]];
        let adjacency = VertexAdjacency::from_faces(&faces, 3);
        for v in 0..3 {
            assert_eq!(adjacency.degree(v), 2);
        }
    }

    #[test]
    fn isolated_vertex_is_legal() {
        let faces = [[0_u32, 1, 2]];
        let adjacency = VertexAdjacency::from_faces(&faces, 5);

        assert_eq!(adjacency.degree(3), 0);
        assert_eq!(adjacency.degree(4), 0);
        assert!(adjacency.inv_degree(3).is_finite());
        assert!(adjacency.inv_degree(3) > 0.0);
    }

    #[test]
    fn degenerate_face_adds_no_self_loop() {
        let faces = [[0_u32, 0, 1]];
        let adjacency = VertexAdjacency::from_faces(&faces, 2);

        assert_eq!(adjacency.neighbors(0), &[1]);
        assert_eq!(adjacency.neighbors(1), &[0]);
    }

    #[test]
    fn neighbors_are_sorted_and_unique() {
        let faces = [[2_u32, 1, 0], [1, 3, 2], [2, 3, 4]];
        let adjacency = VertexAdjacency::from_faces(&faces, 5);

        let n = adjacency.neighbors(2);
        let mut sorted = n.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(n, sorted.as_slice());
        assert_eq!(n, &[0, 1, 3, 4]);
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let faces = [[0_u32, 1, 9]];
        let adjacency = VertexAdjacency::from_faces(&faces, 3);
        assert_eq!(adjacency.neighbors(0), &[1]);
    }
}
