//! Binary isosurface extraction.
//!
//! Extracts the boundary surface of a strictly binary voxel grid at the 0.5
//! level. Voxel centers sit at integer lattice coordinates; a lattice cell
//! whose eight corner voxels mix foreground and background receives one
//! vertex at the mean of its crossing-edge midpoints, and a quad (two
//! triangles) is stitched around every lattice edge whose endpoints
//! disagree. Winding is chosen so normals point from foreground to
//! background, giving a positive signed volume for a closed surface.
//!
//! The lattice is padded with one layer of background on every side, so a
//! mask whose foreground touches the array border still produces a closed
//! surface.

use mask_types::{SurfaceMesh, VoxelMask};
use nalgebra::Point3;
use tracing::{debug, info};

use crate::error::{ExtractError, ExtractResult};

/// Cube corner offsets, x-fastest.
const CORNER_OFFSETS: [(i32, i32, i32); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// Cube edges as pairs of corner indices.
const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Extract the foreground/background boundary surface of a binary mask.
///
/// Expects a strictly binary grid (see [`VoxelMask::binarized`]); any value
/// other than exactly 1 counts as background. Vertex coordinates are scaled
/// by the voxel spacing, so the mesh is in millimeters. Vertices are `f32`,
/// faces `u32`.
///
/// # Errors
///
/// Returns [`ExtractError::NotVolumetric`] for non-3D masks and
/// [`ExtractError::EmptySurface`] when the mask yields no geometry (all
/// background, or nothing crosses the 0.5 level).
///
/// # Example
///
/// ```
/// use mask_extract::extract_surface;
/// use mask_types::VoxelMask;
///
/// let mut mask = VoxelMask::zeros([5, 5, 5], [1.0, 1.0, 1.0]);
/// mask.set(2, 2, 2, 1);
///
/// let mesh = extract_surface(&mask).unwrap();
/// assert!(mesh.face_count() > 0);
/// ```
pub fn extract_surface(mask: &VoxelMask) -> ExtractResult<SurfaceMesh> {
    let Some((dim_x, dim_y, dim_z)) = mask.dims() else {
        return Err(ExtractError::NotVolumetric { rank: mask.rank() });
    };
    let (nx, ny, nz) = (dim_x as i32, dim_y as i32, dim_z as i32);
    let spacing = mask.spacing();

    let inside = |x: i32, y: i32, z: i32| -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && x < nx
            && y < ny
            && z < nz
            && mask.is_foreground(x as usize, y as usize, z as usize)
    };

    // Cells span lattice corners (c..c+1) per axis; one padding cell on
    // each side closes surfaces that touch the border.
    let cells_x = (nx + 1) as usize;
    let cells_y = (ny + 1) as usize;
    let cells_z = (nz + 1) as usize;
    let cell_index =
        |cx: i32, cy: i32, cz: i32| -> usize {
            (cx + 1) as usize + cells_x * ((cy + 1) as usize + cells_y * (cz + 1) as usize)
        };

    let mut cell_vertex = vec![-1_i32; cells_x * cells_y * cells_z];
    let mut vertices: Vec<Point3<f32>> = Vec::new();

    // Pass 1: one vertex per mixed cell, at the mean of crossing-edge
    // midpoints (voxel units), scaled to millimeters.
    for cz in -1..nz {
        for cy in -1..ny {
            for cx in -1..nx {
                let mut corner_in = [false; 8];
                let mut any_in = false;
                let mut all_in = true;
                for (i, (dx, dy, dz)) in CORNER_OFFSETS.iter().enumerate() {
                    let b = inside(cx + dx, cy + dy, cz + dz);
                    corner_in[i] = b;
                    any_in |= b;
                    all_in &= b;
                }
                if !any_in || all_in {
                    continue;
                }

                let mut acc = [0.0_f64; 3];
                let mut crossings = 0_u32;
                for (a, b) in CUBE_EDGES {
                    if corner_in[a] == corner_in[b] {
                        continue;
                    }
                    let (adx, ady, adz) = CORNER_OFFSETS[a];
                    let (bdx, bdy, bdz) = CORNER_OFFSETS[b];
                    acc[0] += f64::from(2 * cx + adx + bdx) * 0.5;
                    acc[1] += f64::from(2 * cy + ady + bdy) * 0.5;
                    acc[2] += f64::from(2 * cz + adz + bdz) * 0.5;
                    crossings += 1;
                }
                // Mixed corners imply at least one crossing edge.
                if crossings == 0 {
                    continue;
                }

                let inv = 1.0 / f64::from(crossings);
                let position = Point3::new(
                    (acc[0] * inv * spacing[0]) as f32,
                    (acc[1] * inv * spacing[1]) as f32,
                    (acc[2] * inv * spacing[2]) as f32,
                );
                cell_vertex[cell_index(cx, cy, cz)] = vertices.len() as i32;
                vertices.push(position);
            }
        }
    }

    let mut faces: Vec<[u32; 3]> = Vec::new();
    {
        let fetch = |cx: i32, cy: i32, cz: i32| -> Option<u32> {
            let v = cell_vertex[cell_index(cx, cy, cz)];
            (v >= 0).then_some(v as u32)
        };
        let mut emit_quad = |q0: Option<u32>,
                             q1: Option<u32>,
                             q2: Option<u32>,
                             q3: Option<u32>| {
            if let (Some(q0), Some(q1), Some(q2), Some(q3)) = (q0, q1, q2, q3) {
                faces.push([q0, q1, q2]);
                faces.push([q0, q2, q3]);
            }
        };

        // Pass 2: stitch a quad around every sign-changing lattice edge.
        // The four incident cells all contain the edge, hence are all mixed
        // and carry vertices. Winding puts normals on the background side.

        // X-edges: (x,y,z) -> (x+1,y,z).
        for z in 0..nz {
            for y in 0..ny {
                for x in -1..nx {
                    let a = inside(x, y, z);
                    if a == inside(x + 1, y, z) {
                        continue;
                    }
                    let q00 = fetch(x, y - 1, z - 1);
                    let q10 = fetch(x, y, z - 1);
                    let q11 = fetch(x, y, z);
                    let q01 = fetch(x, y - 1, z);
                    if a {
                        emit_quad(q00, q10, q11, q01);
                    } else {
                        emit_quad(q00, q01, q11, q10);
                    }
                }
            }
        }

        // Y-edges: (x,y,z) -> (x,y+1,z).
        for z in 0..nz {
            for y in -1..ny {
                for x in 0..nx {
                    let a = inside(x, y, z);
                    if a == inside(x, y + 1, z) {
                        continue;
                    }
                    let q00 = fetch(x - 1, y, z - 1);
                    let q10 = fetch(x, y, z - 1);
                    let q11 = fetch(x, y, z);
                    let q01 = fetch(x - 1, y, z);
                    if a {
                        emit_quad(q00, q01, q11, q10);
                    } else {
                        emit_quad(q00, q10, q11, q01);
                    }
                }
            }
        }

        // Z-edges: (x,y,z) -> (x,y,z+1).
        for z in -1..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let a = inside(x, y, z);
                    if a == inside(x, y, z + 1) {
                        continue;
                    }
                    let q00 = fetch(x - 1, y - 1, z);
                    let q10 = fetch(x, y - 1, z);
                    let q11 = fetch(x, y, z);
                    let q01 = fetch(x - 1, y, z);
                    if a {
                        emit_quad(q00, q10, q11, q01);
                    } else {
                        emit_quad(q00, q01, q11, q10);
                    }
                }
            }
        }
    }

    if faces.is_empty() {
        debug!("no level crossings found");
        return Err(ExtractError::EmptySurface);
    }

    info!(
        vertices = vertices.len(),
        faces = faces.len(),
        "extracted surface"
    );

    Ok(SurfaceMesh::from_parts(vertices, faces))
}
