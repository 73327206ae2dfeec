//! Project save and mesh import

use std::path::Path;

use super::entity::Geometry;
use super::SceneState;
use crate::codec::{format_of, MeshCodec};
use crate::error::{EditorError, EditorResult};
use crate::viewport::mesh::MeshData;

impl SceneState {
    /// Write the meshes of all live entities into one file
    pub fn save_project(&self, path: &Path, codec: &dyn MeshCodec) -> EditorResult<()> {
        let format = format_of(path)?;
        if self.is_empty() {
            return Err(EditorError::Export("Scene is empty. Nothing to save.".into()));
        }
        let mut combined = MeshData::default();
        for id in self.scene.registry.ids() {
            if let Some(mesh) = self.scene.arena.get(*id).and_then(|e| e.geometry.as_mesh()) {
                combined.append(mesh);
            }
        }
        if combined.is_empty() {
            return Err(EditorError::Export("No valid geometry found to save.".into()));
        }
        tracing::debug!("writing {} triangles", combined.triangle_count());
        codec.write(path, format, &combined)
    }

    /// Read a mesh file into a new entity named after the file
    pub fn import_file(&mut self, path: &Path, codec: &dyn MeshCodec) -> EditorResult<String> {
        let format = format_of(path)?;
        let mesh = codec.read(path, format)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        self.create_entity(Geometry::Mesh(mesh), name.as_deref())
    }
}
