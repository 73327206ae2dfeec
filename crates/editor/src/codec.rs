//! Mesh file codecs.
//!
//! File formats are recognized by extension. Reading and writing is delegated
//! to a [`MeshCodec`]; the built-in [`StlCodec`] handles STL through `stl_io`
//! and reports the other recognized formats as unsupported.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use glam::Vec3;
use shared::FileFormat;

use crate::error::{EditorError, EditorResult};
use crate::viewport::mesh::MeshData;

/// External codec seam
pub trait MeshCodec {
    fn supports(&self, format: FileFormat) -> bool;

    fn read(&self, path: &Path, format: FileFormat) -> EditorResult<MeshData>;

    fn write(&self, path: &Path, format: FileFormat, mesh: &MeshData) -> EditorResult<()>;
}

/// Recognized format for `path`, or `UnsupportedFormat`
pub fn format_of(path: &Path) -> EditorResult<FileFormat> {
    FileFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_else(|| path.display().to_string());
        EditorError::UnsupportedFormat(ext)
    })
}

/// Binary STL writer, ASCII/binary STL reader
#[derive(Debug, Default, Clone, Copy)]
pub struct StlCodec;

impl StlCodec {
    fn check(&self, format: FileFormat) -> EditorResult<()> {
        if self.supports(format) {
            Ok(())
        } else {
            Err(EditorError::UnsupportedFormat(format!(
                ".{} (no codec available)",
                format.extension()
            )))
        }
    }
}

impl MeshCodec for StlCodec {
    fn supports(&self, format: FileFormat) -> bool {
        format == FileFormat::Stl
    }

    fn read(&self, path: &Path, format: FileFormat) -> EditorResult<MeshData> {
        self.check(format)?;
        let mut reader = BufReader::new(File::open(path)?);
        let stl = stl_io::read_stl(&mut reader)?;
        let vertex = |i: usize| Vec3::from_array(stl.vertices[i].0);
        let mesh = MeshData::from_triangles(stl.faces.iter().map(|face| {
            let [a, b, c] = face.vertices;
            [vertex(a), vertex(b), vertex(c)]
        }));
        tracing::debug!("read {} triangles from {}", mesh.triangle_count(), path.display());
        Ok(mesh)
    }

    fn write(&self, path: &Path, format: FileFormat, mesh: &MeshData) -> EditorResult<()> {
        self.check(format)?;
        let triangles: Vec<stl_io::Triangle> = mesh
            .triangles()
            .map(|[a, b, c]| stl_io::Triangle {
                normal: stl_io::Normal::new((b - a).cross(c - a).normalize_or_zero().to_array()),
                vertices: [
                    stl_io::Vertex::new(a.to_array()),
                    stl_io::Vertex::new(b.to_array()),
                    stl_io::Vertex::new(c.to_array()),
                ],
            })
            .collect();
        let mut writer = BufWriter::new(File::create(path)?);
        stl_io::write_stl(&mut writer, triangles.iter())?;
        Ok(())
    }
}
