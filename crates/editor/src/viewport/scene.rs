//! Render-side scene membership.
//!
//! The renderer is an external collaborator; the editor only adds and
//! removes entities through [`RenderCollaborator`]. [`RenderScene`] is the
//! headless implementation: it tracks membership and per-entity bounds so
//! callers can frame the camera.

use std::collections::HashMap;

use crate::state::scene::{Entity, EntityId};
use crate::viewport::mesh::Aabb;

/// Narrow interface to the rendering engine
pub trait RenderCollaborator {
    /// Start drawing an entity. Adding an entity twice is rejected.
    fn add_entity(&mut self, entity: &Entity) -> Result<(), String>;

    /// Stop drawing an entity. Removing an absent entity is a no-op.
    fn remove_entity(&mut self, id: EntityId) -> Result<(), String>;

    fn contains(&self, id: EntityId) -> bool;

    /// Ids currently drawn, in insertion order
    fn entity_ids(&self) -> Vec<EntityId>;

    /// Drop everything (new project)
    fn remove_all(&mut self);

    /// Bounds of everything drawn, if anything has extent
    fn bounds(&self) -> Option<Aabb> {
        None
    }
}

/// Headless render scene
#[derive(Debug, Default)]
pub struct RenderScene {
    order: Vec<EntityId>,
    bounds: HashMap<EntityId, Option<Aabb>>,
}

impl RenderScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl RenderCollaborator for RenderScene {
    fn add_entity(&mut self, entity: &Entity) -> Result<(), String> {
        if self.bounds.contains_key(&entity.id) {
            return Err(format!("'{}' is already in the scene", entity.name));
        }
        self.bounds.insert(entity.id, entity.geometry.bounds());
        self.order.push(entity.id);
        Ok(())
    }

    fn remove_entity(&mut self, id: EntityId) -> Result<(), String> {
        if self.bounds.remove(&id).is_some() {
            self.order.retain(|e| *e != id);
        }
        Ok(())
    }

    fn contains(&self, id: EntityId) -> bool {
        self.bounds.contains_key(&id)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    fn remove_all(&mut self) {
        self.order.clear();
        self.bounds.clear();
    }

    fn bounds(&self) -> Option<Aabb> {
        self.order
            .iter()
            .filter_map(|id| self.bounds.get(id).copied().flatten())
            .reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scene::Geometry;
    use crate::viewport::mesh::{cube, DEFAULT_COLOR};
    use glam::Vec3;

    #[test]
    fn double_add_rejected_double_remove_noop() {
        let mut scene = RenderScene::new();
        let e = Entity::new("Cube", Geometry::Mesh(cube(1.0, 1.0, 1.0, DEFAULT_COLOR)));
        scene.add_entity(&e).unwrap();
        assert!(scene.add_entity(&e).is_err());
        assert_eq!(scene.len(), 1);

        scene.remove_entity(e.id).unwrap();
        scene.remove_entity(e.id).unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn bounds_cover_all_entities() {
        let mut scene = RenderScene::new();
        assert!(scene.bounds().is_none());
        let a = Entity::new("A", Geometry::Mesh(cube(2.0, 2.0, 2.0, DEFAULT_COLOR)));
        scene.add_entity(&a).unwrap();
        let b = scene.bounds().unwrap();
        assert_eq!(b.min, Vec3::splat(-1.0));
        assert_eq!(b.max, Vec3::splat(1.0));
    }
}
