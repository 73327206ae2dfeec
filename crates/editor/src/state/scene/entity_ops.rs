//! Entity CRUD operations

use tracing::warn;

use super::command::Command;
use super::entity::{Entity, EntityId, Geometry};
use super::SceneState;
use crate::error::{EditorError, EditorResult};

impl SceneState {
    /// Create an entity and add it through an undoable command.
    ///
    /// Without a name the entity is called `Mesh_{n}`. The name is probed
    /// against the registry; the name actually assigned is returned.
    pub fn create_entity(&mut self, geometry: Geometry, name: Option<&str>) -> EditorResult<String> {
        let requested = name.map(str::trim).filter(|n| !n.is_empty());
        let base = match requested {
            Some(n) => n.to_string(),
            None => format!("Mesh_{}", self.counter + 1),
        };
        let id = self.stage(geometry, &base)?;
        self.execute(Command::Add { entity: id })?;
        if requested.is_none() {
            self.counter += 1;
        }
        Ok(self.name_of(id))
    }

    /// Delete a live entity by name
    pub fn delete_by_name(&mut self, name: &str) -> EditorResult<()> {
        let id = self.scene.registry.find(name)?;
        self.execute(Command::Delete { entity: id })
    }

    /// Swap a live entity for new geometry (extrude, revolve)
    pub fn replace(&mut self, old: &str, geometry: Geometry, name: &str) -> EditorResult<String> {
        let old = self.scene.registry.find(old)?;
        let new = self.stage(geometry, name)?;
        self.execute(Command::Replace { old, new })?;
        Ok(self.name_of(new))
    }

    /// Consume two live entities into one result (boolean)
    pub fn compose(
        &mut self,
        operands: [&str; 2],
        geometry: Geometry,
        name: &str,
    ) -> EditorResult<String> {
        let a = self.scene.registry.find(operands[0])?;
        let b = self.scene.registry.find(operands[1])?;
        if a == b {
            return Err(EditorError::rejected("two distinct objects are required"));
        }
        let result = self.stage(geometry, name)?;
        self.execute(Command::Compose {
            result,
            operands: [a, b],
        })?;
        Ok(self.name_of(result))
    }

    /// Rename a live entity. Not undoable.
    pub fn rename(&mut self, old: &str, new: &str) -> EditorResult<String> {
        let scene = &mut self.scene;
        let assigned = scene.registry.rename(&mut scene.arena, old, new)?;
        if assigned != old {
            self.version += 1;
        }
        Ok(assigned)
    }

    /// Drop the whole scene and both history stacks without reverting anything
    pub fn new_project(&mut self) {
        let scene = &mut self.scene;
        self.history.clear(&mut scene.arena);
        for id in scene.registry.drain() {
            scene.arena.release(id);
        }
        scene.render.remove_all();
        if !scene.arena.is_empty() {
            warn!("{} unreferenced entities left after reset", scene.arena.len());
            scene.arena.clear();
        }
        self.counter = 0;
        self.version += 1;
    }

    /// Put a not-yet-live entity into the arena under a resolved name
    fn stage(&mut self, geometry: Geometry, base: &str) -> EditorResult<EntityId> {
        if geometry.is_empty() {
            warn!("Empty geometry.");
            return Err(EditorError::rejected("empty geometry"));
        }
        let name = self.scene.registry.unique_name(base);
        Ok(self.scene.arena.insert(Entity::new(name, geometry)))
    }

    fn name_of(&self, id: EntityId) -> String {
        self.scene
            .arena
            .get(id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scene::Profile;
    use glam::Vec3;

    fn point() -> Geometry {
        Geometry::Profile(Profile::new(vec![Vec3::ZERO], false))
    }

    #[test]
    fn default_names_count_up() {
        let mut s = SceneState::default();
        assert_eq!(s.create_entity(point(), None).unwrap(), "Mesh_1");
        assert_eq!(s.create_entity(point(), None).unwrap(), "Mesh_2");
        // explicit names leave the counter alone
        assert_eq!(s.create_entity(point(), Some("Mesh_3")).unwrap(), "Mesh_3");
        assert_eq!(s.create_entity(point(), None).unwrap(), "Mesh_3_1");
    }

    #[test]
    fn empty_geometry_is_rejected() {
        let mut s = SceneState::default();
        let err = s
            .create_entity(Geometry::Profile(Profile::default()), Some("X"))
            .unwrap_err();
        assert!(matches!(err, EditorError::CollaboratorRejected(_)));
        assert!(s.is_empty());
        assert!(!s.can_undo());
        assert!(s.arena().is_empty());
    }

    #[test]
    fn compose_requires_distinct_operands() {
        let mut s = SceneState::default();
        s.create_entity(point(), Some("A")).unwrap();
        let err = s.compose(["A", "A"], point(), "union_result").unwrap_err();
        assert!(matches!(err, EditorError::CollaboratorRejected(_)));
        assert_eq!(s.names(), vec!["A"]);
        assert_eq!(s.arena().len(), 1);
    }

    #[test]
    fn rename_is_not_undoable() {
        let mut s = SceneState::default();
        s.create_entity(point(), Some("A")).unwrap();
        assert_eq!(s.rename("A", "B").unwrap(), "B");
        assert_eq!(s.history().undo_depth(), 1);
        s.undo().unwrap();
        assert!(s.is_empty());
        s.redo().unwrap();
        assert_eq!(s.names(), vec!["B"]);
    }

    #[test]
    fn new_project_frees_everything() {
        let mut s = SceneState::default();
        s.create_entity(point(), None).unwrap();
        s.create_entity(point(), None).unwrap();
        s.delete_by_name("Mesh_1").unwrap();
        s.undo().unwrap();
        s.new_project();
        assert!(s.is_empty());
        assert!(!s.can_undo() && !s.can_redo());
        assert!(s.arena().is_empty());
        assert!(s.render().entity_ids().is_empty());
        assert_eq!(s.create_entity(point(), None).unwrap(), "Mesh_1");
    }
}
