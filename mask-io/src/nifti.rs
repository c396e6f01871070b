//! NIfTI-1 volume reading and writing.
//!
//! Reads single-file NIfTI-1 (`.nii`, gzipped `.nii.gz`), little- or
//! big-endian, converting voxel values to `u8` labels. Writing produces a
//! minimal little-endian uint8 volume with an identity-aligned sform, which
//! is all the pipeline and its round-trip tests need.
//!
//! # Header Layout
//!
//! The fixed 348-byte NIfTI-1 header; only the fields this reader consumes:
//!
//! ```text
//! offset 0    INT32     sizeof_hdr   (348; also the endianness probe)
//! offset 40   INT16[8]  dim          (dim[0] = rank, dim[1..] = extents)
//! offset 70   INT16     datatype
//! offset 76   FLOAT32[8] pixdim      (pixdim[1..=3] = spacing, mm)
//! offset 108  FLOAT32   vox_offset
//! offset 112  FLOAT32   scl_slope
//! offset 116  FLOAT32   scl_inter
//! offset 254  INT16     sform_code
//! offset 280  FLOAT32[12] srow_x, srow_y, srow_z
//! offset 344  CHAR[4]   magic        ("n+1\0" for single-file)
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use mask_types::VoxelMask;

use crate::error::{IoError, IoResult};

/// Fixed NIfTI-1 header size in bytes.
const HEADER_SIZE: usize = 348;

/// Data offset written by `save_mask`: header plus the 4-byte extension flag.
const WRITE_VOX_OFFSET: usize = 352;

/// Gzip stream magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// NIfTI data type codes.
const DT_UINT8: i16 = 2;
const DT_INT16: i16 = 4;
const DT_INT32: i16 = 8;
const DT_FLOAT32: i16 = 16;
const DT_FLOAT64: i16 = 64;
const DT_INT8: i16 = 256;
const DT_UINT16: i16 = 512;

/// Byte order of a NIfTI file, probed from `sizeof_hdr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

impl Endian {
    fn i16(self, b: &[u8], off: usize) -> i16 {
        let raw = [b[off], b[off + 1]];
        match self {
            Self::Little => i16::from_le_bytes(raw),
            Self::Big => i16::from_be_bytes(raw),
        }
    }

    fn u16(self, b: &[u8], off: usize) -> u16 {
        let raw = [b[off], b[off + 1]];
        match self {
            Self::Little => u16::from_le_bytes(raw),
            Self::Big => u16::from_be_bytes(raw),
        }
    }

    fn i32(self, b: &[u8], off: usize) -> i32 {
        let raw = [b[off], b[off + 1], b[off + 2], b[off + 3]];
        match self {
            Self::Little => i32::from_le_bytes(raw),
            Self::Big => i32::from_be_bytes(raw),
        }
    }

    fn f32(self, b: &[u8], off: usize) -> f32 {
        let raw = [b[off], b[off + 1], b[off + 2], b[off + 3]];
        match self {
            Self::Little => f32::from_le_bytes(raw),
            Self::Big => f32::from_be_bytes(raw),
        }
    }

    fn f64(self, b: &[u8], off: usize) -> f64 {
        let raw = [
            b[off],
            b[off + 1],
            b[off + 2],
            b[off + 3],
            b[off + 4],
            b[off + 5],
            b[off + 6],
            b[off + 7],
        ];
        match self {
            Self::Little => f64::from_le_bytes(raw),
            Self::Big => f64::from_be_bytes(raw),
        }
    }
}

/// The header fields this reader consumes.
#[derive(Debug)]
struct Header {
    shape: Vec<usize>,
    datatype: i16,
    spacing: [f64; 3],
    vox_offset: usize,
    scl_slope: f32,
    scl_inter: f32,
    sform_code: i16,
    srow: [[f32; 4]; 3],
}

/// Load a NIfTI-1 mask and return it with its voxel spacing attached.
///
/// Gzip compression is detected from the stream magic, not the file name.
/// Voxel values are converted to `u8` labels after `scl_slope`/`scl_inter`
/// scaling; validation of the label content happens later in the pipeline.
///
/// With `reorient_canonical`, a rank-3 volume carrying a usable sform is
/// permuted and flipped to the closest-canonical RAS+ orientation, with the
/// spacing permuted accordingly.
///
/// # Errors
///
/// Returns an error if the file is missing, is not single-file NIfTI-1,
/// uses an unsupported data type, or the voxel payload is truncated.
///
/// # Example
///
/// ```no_run
/// use mask_io::load_mask;
///
/// let mask = load_mask("segmentation.nii.gz", true).unwrap();
/// println!("{:?} @ {:?} mm", mask.shape(), mask.spacing());
/// ```
pub fn load_mask<P: AsRef<Path>>(path: P, reorient_canonical: bool) -> IoResult<VoxelMask> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;

    let bytes = if raw.len() >= 2 && raw[..2] == GZIP_MAGIC {
        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
        decoded
    } else {
        raw
    };

    let (header, endian) = parse_header(&bytes)?;
    let mask = decode_voxels(&bytes, &header, endian)?;

    if reorient_canonical && mask.rank() == 3 && header.sform_code > 0 {
        Ok(reorient_to_canonical(mask, &header.srow))
    } else {
        Ok(mask)
    }
}

fn parse_header(bytes: &[u8]) -> IoResult<(Header, Endian)> {
    if bytes.len() < HEADER_SIZE {
        return Err(IoError::invalid_header(format!(
            "file too small for a NIfTI-1 header ({} bytes)",
            bytes.len()
        )));
    }

    // sizeof_hdr doubles as the endianness probe.
    let endian = if Endian::Little.i32(bytes, 0) == 348 {
        Endian::Little
    } else if Endian::Big.i32(bytes, 0) == 348 {
        Endian::Big
    } else {
        return Err(IoError::invalid_header("sizeof_hdr is not 348"));
    };

    let magic = &bytes[344..348];
    if magic == b"ni1\0" {
        return Err(IoError::invalid_header(
            "paired .hdr/.img NIfTI is not supported, use single-file .nii",
        ));
    }
    if magic != b"n+1\0" {
        return Err(IoError::invalid_header("missing NIfTI-1 magic"));
    }

    let ndim = endian.i16(bytes, 40);
    if !(1..=7).contains(&ndim) {
        return Err(IoError::invalid_header(format!(
            "dim[0] out of range: {ndim}"
        )));
    }

    let mut shape = Vec::with_capacity(ndim as usize);
    for d in 1..=ndim {
        let extent = endian.i16(bytes, 40 + 2 * d as usize);
        if extent < 1 {
            return Err(IoError::invalid_header(format!(
                "dim[{d}] is not positive: {extent}"
            )));
        }
        shape.push(extent as usize);
    }

    // Non-positive pixdim entries fall back to 1 mm, as loaders commonly do.
    let mut spacing = [1.0_f64; 3];
    for (axis, item) in spacing.iter_mut().enumerate() {
        let p = f64::from(endian.f32(bytes, 76 + 4 * (axis + 1))).abs();
        if p > 0.0 && p.is_finite() {
            *item = p;
        }
    }

    let vox_offset = endian.f32(bytes, 108);
    if !vox_offset.is_finite() || vox_offset < HEADER_SIZE as f32 {
        return Err(IoError::invalid_header(format!(
            "vox_offset out of range: {vox_offset}"
        )));
    }

    let mut srow = [[0.0_f32; 4]; 3];
    for (row, item) in srow.iter_mut().enumerate() {
        for (col, value) in item.iter_mut().enumerate() {
            *value = endian.f32(bytes, 280 + 16 * row + 4 * col);
        }
    }

    Ok((
        Header {
            shape,
            datatype: endian.i16(bytes, 70),
            spacing,
            vox_offset: vox_offset as usize,
            scl_slope: endian.f32(bytes, 112),
            scl_inter: endian.f32(bytes, 116),
            sform_code: endian.i16(bytes, 254),
            srow,
        },
        endian,
    ))
}

fn element_size(datatype: i16) -> IoResult<usize> {
    match datatype {
        DT_UINT8 | DT_INT8 => Ok(1),
        DT_INT16 | DT_UINT16 => Ok(2),
        DT_INT32 | DT_FLOAT32 => Ok(4),
        DT_FLOAT64 => Ok(8),
        code => Err(IoError::UnsupportedDataType { code }),
    }
}

fn decode_voxels(bytes: &[u8], header: &Header, endian: Endian) -> IoResult<VoxelMask> {
    let count: usize = header.shape.iter().product();
    let esize = element_size(header.datatype)?;

    let needed = header.vox_offset + count * esize;
    if bytes.len() < needed {
        return Err(IoError::TruncatedData {
            expected: needed,
            actual: bytes.len(),
        });
    }

    let slope = header.scl_slope;
    let inter = header.scl_inter;

    let mut data = Vec::with_capacity(count);
    for i in 0..count {
        let pos = header.vox_offset + i * esize;
        let mut value = match header.datatype {
            DT_UINT8 => f64::from(bytes[pos]),
            DT_INT8 => f64::from(bytes[pos] as i8),
            DT_INT16 => f64::from(endian.i16(bytes, pos)),
            DT_UINT16 => f64::from(endian.u16(bytes, pos)),
            DT_INT32 => f64::from(endian.i32(bytes, pos)),
            DT_FLOAT32 => f64::from(endian.f32(bytes, pos)),
            DT_FLOAT64 => endian.f64(bytes, pos),
            code => return Err(IoError::UnsupportedDataType { code }),
        };
        // slope == 0 means "no scaling stored".
        if slope != 0.0 {
            value = value * f64::from(slope) + f64::from(inter);
        }
        data.push(value as u8);
    }

    VoxelMask::from_parts(data, header.shape.clone(), header.spacing)
        .map_err(|e| IoError::invalid_header(e.to_string()))
}

/// Permute and flip a volume to the closest-canonical RAS+ orientation.
///
/// Each data axis is assigned the world axis with the largest absolute
/// component in the corresponding sform column (nearest-axis decomposition).
/// A degenerate affine that does not yield a permutation leaves the volume
/// untouched.
fn reorient_to_canonical(mask: VoxelMask, srow: &[[f32; 4]; 3]) -> VoxelMask {
    let Some((nx, ny, nz)) = mask.dims() else {
        return mask;
    };
    let dims = [nx, ny, nz];
    let spacing = mask.spacing();

    // axis[j]: world axis data axis j maps to; positive[j]: same direction.
    let mut axis = [0_usize; 3];
    let mut positive = [true; 3];
    for j in 0..3 {
        let mut best = 0;
        for i in 1..3 {
            if srow[i][j].abs() > srow[best][j].abs() {
                best = i;
            }
        }
        axis[j] = best;
        positive[j] = srow[best][j] >= 0.0;
    }

    let mut seen = [false; 3];
    for &a in &axis {
        seen[a] = true;
    }
    if seen != [true; 3] {
        // Degenerate affine; keep the stored orientation.
        return mask;
    }

    if axis == [0, 1, 2] && positive == [true; 3] {
        return mask;
    }

    let mut out_dims = [0_usize; 3];
    let mut out_spacing = [1.0_f64; 3];
    for j in 0..3 {
        out_dims[axis[j]] = dims[j];
        out_spacing[axis[j]] = spacing[j];
    }

    let mut out = VoxelMask::zeros(out_dims, out_spacing);
    for oz in 0..out_dims[2] {
        for oy in 0..out_dims[1] {
            for ox in 0..out_dims[0] {
                let o = [ox, oy, oz];
                let mut src = [0_usize; 3];
                for j in 0..3 {
                    let along = o[axis[j]];
                    src[j] = if positive[j] {
                        along
                    } else {
                        dims[j] - 1 - along
                    };
                }
                out.set(ox, oy, oz, mask.get(src[0], src[1], src[2]));
            }
        }
    }
    out
}

/// Write a mask as a minimal little-endian uint8 NIfTI-1 volume.
///
/// The sform encodes an identity-aligned RAS+ grid scaled by the voxel
/// spacing. A path ending in `.gz` produces a gzipped stream. Parent
/// directories are created on demand.
///
/// # Errors
///
/// Returns [`IoError::NotVolumetric`] for non-3D masks, or an I/O error if
/// the file cannot be written.
pub fn save_mask<P: AsRef<Path>>(path: P, mask: &VoxelMask) -> IoResult<()> {
    let path = path.as_ref();
    let Some((nx, ny, nz)) = mask.dims() else {
        return Err(IoError::NotVolumetric { rank: mask.rank() });
    };

    let mut buf = vec![0_u8; WRITE_VOX_OFFSET];
    put_i32(&mut buf, 0, 348);
    // dim
    put_i16(&mut buf, 40, 3);
    put_i16(&mut buf, 42, nx as i16);
    put_i16(&mut buf, 44, ny as i16);
    put_i16(&mut buf, 46, nz as i16);
    for d in 4..8 {
        put_i16(&mut buf, 40 + 2 * d, 1);
    }
    put_i16(&mut buf, 70, DT_UINT8);
    put_i16(&mut buf, 72, 8); // bitpix
    let spacing = mask.spacing();
    put_f32(&mut buf, 76, 1.0); // pixdim[0] (qfac)
    for axis in 0..3 {
        put_f32(&mut buf, 76 + 4 * (axis + 1), spacing[axis] as f32);
    }
    put_f32(&mut buf, 108, WRITE_VOX_OFFSET as f32);
    put_f32(&mut buf, 112, 1.0); // scl_slope
    put_i16(&mut buf, 254, 1); // sform_code: aligned
    for axis in 0..3 {
        put_f32(&mut buf, 280 + 16 * axis + 4 * axis, spacing[axis] as f32);
    }
    buf[344..348].copy_from_slice(b"n+1\0");
    // bytes 348..352 stay zero: no header extensions.

    buf.extend_from_slice(mask.values());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&buf)?;
        encoder.finish()?;
    } else {
        let mut file = file;
        file.write_all(&buf)?;
    }
    Ok(())
}

fn put_i16(buf: &mut [u8], off: usize, value: i16) {
    buf[off..off + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_i32(buf: &mut [u8], off: usize, value: i32) {
    buf[off..off + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_f32(buf: &mut [u8], off: usize, value: f32) {
    buf[off..off + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_mask() -> VoxelMask {
        let mut mask = VoxelMask::zeros([4, 3, 2], [0.5, 1.0, 2.0]);
        mask.set(0, 0, 0, 1);
        mask.set(3, 2, 1, 1);
        mask.set(1, 1, 0, 7);
        mask
    }

    #[test]
    fn roundtrip_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.nii");

        let original = sample_mask();
        save_mask(&path, &original).unwrap();
        let loaded = load_mask(&path, false).unwrap();

        assert_eq!(loaded.shape(), original.shape());
        assert_eq!(loaded.values(), original.values());
        let spacing = loaded.spacing();
        assert_relative_eq!(spacing[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(spacing[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(spacing[2], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn roundtrip_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.nii.gz");

        let original = sample_mask();
        save_mask(&path, &original).unwrap();

        // Written bytes really are a gzip stream.
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &GZIP_MAGIC);

        let loaded = load_mask(&path, false).unwrap();
        assert_eq!(loaded.values(), original.values());
    }

    #[test]
    fn roundtrip_canonical_identity_sform_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.nii");

        let original = sample_mask();
        save_mask(&path, &original).unwrap();
        let loaded = load_mask(&path, true).unwrap();
        assert_eq!(loaded.values(), original.values());
    }

    #[test]
    fn load_missing_file() {
        let result = load_mask("does_not_exist_12345.nii", false);
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.nii");
        std::fs::write(&path, b"definitely not a nifti file").unwrap();

        let result = load_mask(&path, false);
        assert!(matches!(result, Err(IoError::InvalidHeader { .. })));
    }

    #[test]
    fn load_rejects_truncated_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.nii");
        save_mask(&path, &sample_mask()).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        bytes.truncate(WRITE_VOX_OFFSET + 3);
        std::fs::write(&path, &bytes).unwrap();

        let result = load_mask(&path, false);
        assert!(matches!(result, Err(IoError::TruncatedData { .. })));
    }

    #[test]
    fn save_rejects_non_volumetric() {
        let mask = VoxelMask::from_parts(vec![0; 4], vec![2, 2], [1.0, 1.0, 1.0]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = save_mask(dir.path().join("bad.nii"), &mask);
        assert!(matches!(result, Err(IoError::NotVolumetric { rank: 2 })));
    }

    #[test]
    fn big_endian_header_is_detected() {
        // Hand-build a minimal big-endian single-voxel uint8 volume.
        let mut buf = vec![0_u8; 352];
        buf[0..4].copy_from_slice(&348_i32.to_be_bytes());
        buf[40..42].copy_from_slice(&3_i16.to_be_bytes());
        for d in 1..8 {
            buf[40 + 2 * d..42 + 2 * d].copy_from_slice(&1_i16.to_be_bytes());
        }
        buf[70..72].copy_from_slice(&DT_UINT8.to_be_bytes());
        buf[72..74].copy_from_slice(&8_i16.to_be_bytes());
        for p in 0..4 {
            buf[76 + 4 * p..80 + 4 * p].copy_from_slice(&1.0_f32.to_be_bytes());
        }
        buf[108..112].copy_from_slice(&352.0_f32.to_be_bytes());
        buf[344..348].copy_from_slice(b"n+1\0");
        buf.push(1); // the single voxel

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("be.nii");
        std::fs::write(&path, &buf).unwrap();

        let mask = load_mask(&path, false).unwrap();
        assert_eq!(mask.shape(), &[1, 1, 1]);
        assert_eq!(mask.values(), &[1]);
    }

    #[test]
    fn scl_slope_scaling_applies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaled.nii");

        let mask = sample_mask();
        save_mask(&path, &mask).unwrap();

        // Patch scl_slope to 2.0: every stored 1 should load as 2.
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[112..116].copy_from_slice(&2.0_f32.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let loaded = load_mask(&path, false).unwrap();
        assert_eq!(loaded.get(0, 0, 0), 2);
        assert_eq!(loaded.get(1, 1, 0), 14);
    }

    #[test]
    fn reorient_flips_negative_axis() {
        let mut mask = VoxelMask::zeros([3, 2, 2], [1.0, 1.0, 1.0]);
        mask.set(0, 0, 0, 1);

        // x axis stored right-to-left: srow_x = [-1, 0, 0, t].
        let srow = [
            [-1.0, 0.0, 0.0, 2.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        let out = reorient_to_canonical(mask, &srow);

        assert_eq!(out.dims(), Some((3, 2, 2)));
        assert_eq!(out.get(2, 0, 0), 1);
        assert_eq!(out.get(0, 0, 0), 0);
    }

    #[test]
    fn reorient_permutes_swapped_axes() {
        let mut mask = VoxelMask::zeros([4, 2, 2], [0.5, 1.0, 2.0]);
        mask.set(3, 1, 0, 1);

        // Data axis 0 runs along world y, data axis 1 along world x.
        let srow = [
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        let out = reorient_to_canonical(mask, &srow);

        assert_eq!(out.dims(), Some((2, 4, 2)));
        let spacing = out.spacing();
        assert_relative_eq!(spacing[0], 1.0);
        assert_relative_eq!(spacing[1], 0.5);
        assert_relative_eq!(spacing[2], 2.0);
        assert_eq!(out.get(1, 3, 0), 1);
    }

    #[test]
    fn reorient_keeps_degenerate_affine() {
        let mut mask = VoxelMask::zeros([2, 2, 2], [1.0, 1.0, 1.0]);
        mask.set(0, 1, 0, 1);

        // Two columns dominated by the same world axis: not a permutation.
        let srow = [
            [1.0, 1.0, 0.0, 0.0],
            [0.1, 0.1, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        let out = reorient_to_canonical(mask.clone(), &srow);
        assert_eq!(out.values(), mask.values());
    }
}
