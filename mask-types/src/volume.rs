//! Labeled voxel volume with physical spacing.

use crate::error::{MaskError, MaskResult};

/// The foreground label value.
pub const FOREGROUND: u8 = 1;

/// A volumetric grid of discrete labels with physical voxel spacing.
///
/// Values are stored x-fastest: the linear index of voxel `(x, y, z)` in a
/// rank-3 mask is `x + nx * (y + ny * z)`, matching the on-disk layout of
/// common volumetric formats.
///
/// The shape is kept as a `Vec<usize>` rather than a fixed triple so that
/// non-3D payloads (a 4D time series, say) can be represented long enough
/// for [`crate::validate_shape`] to reject them with a useful message.
/// Accessors that only make sense on volumes ([`VoxelMask::dims`],
/// [`VoxelMask::get`], [`VoxelMask::set`]) are rank-3 only.
///
/// # Example
///
/// ```
/// use mask_types::VoxelMask;
///
/// let mut mask = VoxelMask::zeros([4, 4, 4], [1.0, 1.0, 1.0]);
/// mask.set(1, 2, 3, 1);
/// assert_eq!(mask.get(1, 2, 3), 1);
/// assert_eq!(mask.foreground_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelMask {
    data: Vec<u8>,
    shape: Vec<usize>,
    spacing: [f64; 3],
}

impl VoxelMask {
    /// Create a zero-filled rank-3 mask.
    #[must_use]
    pub fn zeros(dims: [usize; 3], spacing: [f64; 3]) -> Self {
        let [nx, ny, nz] = dims;
        Self {
            data: vec![0; nx * ny * nz],
            shape: vec![nx, ny, nz],
            spacing,
        }
    }

    /// Create a mask from raw voxel data and an arbitrary-rank shape.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::DataLength`] if `data.len()` does not equal the
    /// product of the shape extents.
    pub fn from_parts(data: Vec<u8>, shape: Vec<usize>, spacing: [f64; 3]) -> MaskResult<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(MaskError::DataLength {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            shape,
            spacing,
        })
    }

    /// Number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// The shape, one extent per dimension.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The `(nx, ny, nz)` extents, if this mask is rank 3.
    #[must_use]
    pub fn dims(&self) -> Option<(usize, usize, usize)> {
        match self.shape[..] {
            [nx, ny, nz] => Some((nx, ny, nz)),
            _ => None,
        }
    }

    /// Physical voxel spacing in millimeters, per axis.
    #[must_use]
    pub const fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Raw voxel values in x-fastest order.
    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.data
    }

    /// Value at `(x, y, z)`. Returns 0 for out-of-bounds coordinates or
    /// non-3D masks, mirroring background padding.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        match self.dims() {
            Some((nx, ny, nz)) if x < nx && y < ny && z < nz => {
                self.data[x + nx * (y + ny * z)]
            }
            _ => 0,
        }
    }

    /// Set the value at `(x, y, z)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u8) {
        if let Some((nx, ny, nz)) = self.dims() {
            if x < nx && y < ny && z < nz {
                self.data[x + nx * (y + ny * z)] = value;
            }
        }
    }

    /// True when `(x, y, z)` holds the foreground label. Out-of-bounds
    /// coordinates count as background.
    #[must_use]
    pub fn is_foreground(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z) == FOREGROUND
    }

    /// Number of voxels equal to the foreground label.
    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Total number of voxels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the mask holds no voxels at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Project onto a strict {0,1} grid by testing equality with the
    /// foreground label.
    ///
    /// This is the single point where the trust-but-don't-verify binarity
    /// policy takes effect: any value other than exactly 1, including stray
    /// non-binary contamination, becomes background.
    #[must_use]
    pub fn binarized(&self) -> Self {
        Self {
            data: self
                .data
                .iter()
                .map(|&v| u8::from(v == FOREGROUND))
                .collect(),
            shape: self.shape.clone(),
            spacing: self.spacing,
        }
    }

    /// Replace the spacing, keeping voxel data untouched.
    #[must_use]
    pub fn with_spacing(mut self, spacing: [f64; 3]) -> Self {
        self.spacing = spacing;
        self
    }
}
