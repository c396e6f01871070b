//! Wavefront OBJ mesh export.
//!
//! Plain-text triangle output: one `v x y z` line per vertex (6 decimal
//! digits), then one `f i j k` line per face. OBJ indices are 1-based; the
//! +1 offset is applied here and nowhere else.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::IoResult;

/// Save a triangle mesh as a Wavefront OBJ file.
///
/// Output is deterministic: identical input produces byte-identical files.
/// Parent directories are created on demand.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use mask_io::save_obj;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
/// save_obj("triangle.obj", &vertices, &faces).unwrap();
/// ```
pub fn save_obj<P: AsRef<Path>>(
    path: P,
    vertices: &[Point3<f32>],
    faces: &[[u32; 3]],
) -> IoResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for v in vertices {
        writeln!(writer, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for &[a, b, c] in faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    writer.flush()?;
    Ok(())
}
