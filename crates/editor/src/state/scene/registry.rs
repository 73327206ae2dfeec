//! Name index of the live entities.
//!
//! Names are unique among live entities at every instant. Uniqueness is
//! resolved when a name is chosen (creation, rename) by probing `base`,
//! `base_1`, `base_2`, ... ; `insert` only guards against names that were
//! never resolved.

use std::collections::HashMap;

use super::entity::{Entity, EntityArena, EntityId};
use crate::error::{EditorError, EditorResult};

#[derive(Debug, Default)]
pub struct Registry {
    by_name: HashMap<String, EntityId>,
    names: HashMap<EntityId, String>,
    /// Browser order (insertion order)
    order: Vec<EntityId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live entity under its current name
    pub fn insert(&mut self, entity: &Entity) -> EditorResult<()> {
        match self.by_name.get(&entity.name) {
            Some(id) if *id == entity.id => return Ok(()),
            Some(_) => return Err(EditorError::DuplicateName(entity.name.clone())),
            None => {}
        }
        if let Some(stale) = self.names.remove(&entity.id) {
            self.by_name.remove(&stale);
        } else {
            self.order.push(entity.id);
        }
        self.by_name.insert(entity.name.clone(), entity.id);
        self.names.insert(entity.id, entity.name.clone());
        Ok(())
    }

    /// Remove an entity. No-op if absent; returns whether it was present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(name) = self.names.remove(&id) else {
            return false;
        };
        self.by_name.remove(&name);
        self.order.retain(|e| *e != id);
        true
    }

    pub fn find(&self, name: &str) -> EditorResult<EntityId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| EditorError::NotFound(name.to_string()))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// First free name among `base`, `base_1`, `base_2`, ...
    pub fn unique_name(&self, base: &str) -> String {
        self.probe(base, None)
    }

    /// Same as `unique_name`, but a name held by `owner` counts as free
    pub fn unique_name_for(&self, base: &str, owner: EntityId) -> String {
        self.probe(base, Some(owner))
    }

    fn probe(&self, base: &str, owner: Option<EntityId>) -> String {
        let taken = |name: &str| match self.by_name.get(name) {
            Some(id) => Some(*id) != owner,
            None => false,
        };
        if !taken(base) {
            return base.to_string();
        }
        let mut i = 1;
        loop {
            let candidate = format!("{base}_{i}");
            if !taken(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    /// Rename a live entity; returns the name actually assigned.
    pub fn rename(
        &mut self,
        arena: &mut EntityArena,
        old: &str,
        new: &str,
    ) -> EditorResult<String> {
        let id = self.find(old)?;
        let new = new.trim();
        if new.is_empty() {
            return Err(EditorError::InvalidName);
        }
        if new == old {
            return Ok(old.to_string());
        }
        let assigned = self.unique_name_for(new, id);
        self.by_name.remove(old);
        self.by_name.insert(assigned.clone(), id);
        self.names.insert(id, assigned.clone());
        arena.set_name(id, assigned.clone());
        Ok(assigned)
    }

    /// Live entity ids in browser order
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Live names in browser order
    pub fn names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|id| self.names.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every entry and return the ids that were live
    pub(crate) fn drain(&mut self) -> Vec<EntityId> {
        self.by_name.clear();
        self.names.clear();
        std::mem::take(&mut self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scene::entity::{Geometry, Profile};

    fn entity(name: &str) -> Entity {
        Entity::new(name, Geometry::Profile(Profile::new(vec![glam::Vec3::ZERO], false)))
    }

    #[test]
    fn probing_appends_suffixes() {
        let mut reg = Registry::new();
        assert_eq!(reg.unique_name("Mesh"), "Mesh");
        reg.insert(&entity("Mesh")).unwrap();
        assert_eq!(reg.unique_name("Mesh"), "Mesh_1");
        reg.insert(&entity("Mesh_1")).unwrap();
        assert_eq!(reg.unique_name("Mesh"), "Mesh_2");
    }

    #[test]
    fn insert_rejects_unresolved_duplicate() {
        let mut reg = Registry::new();
        reg.insert(&entity("Cube")).unwrap();
        let err = reg.insert(&entity("Cube")).unwrap_err();
        assert!(matches!(err, EditorError::DuplicateName(n) if n == "Cube"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn insert_same_entity_twice_is_idempotent() {
        let mut reg = Registry::new();
        let e = entity("Cube");
        reg.insert(&e).unwrap();
        reg.insert(&e).unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut reg = Registry::new();
        assert!(!reg.remove(EntityId::new()));
        let e = entity("A");
        reg.insert(&e).unwrap();
        assert!(reg.remove(e.id));
        assert!(!reg.remove(e.id));
        assert!(reg.is_empty());
    }

    #[test]
    fn find_missing_is_not_found() {
        let reg = Registry::new();
        assert!(matches!(reg.find("nope"), Err(EditorError::NotFound(_))));
    }

    #[test]
    fn rename_probes_excluding_self() {
        let mut arena = EntityArena::new();
        let mut reg = Registry::new();
        for name in ["Cube", "Sphere"] {
            let e = entity(name);
            reg.insert(&e).unwrap();
            arena.insert(e);
        }

        assert_eq!(reg.rename(&mut arena, "Sphere", "Cube").unwrap(), "Cube_1");
        let id = reg.find("Cube_1").unwrap();
        assert_eq!(arena.get(id).unwrap().name, "Cube_1");
        assert!(!reg.contains_name("Sphere"));

        // same name is a no-op
        assert_eq!(reg.rename(&mut arena, "Cube_1", "Cube_1").unwrap(), "Cube_1");
        assert_eq!(reg.names(), vec!["Cube", "Cube_1"]);
    }

    #[test]
    fn rename_errors() {
        let mut arena = EntityArena::new();
        let mut reg = Registry::new();
        let e = entity("A");
        reg.insert(&e).unwrap();
        arena.insert(e);
        assert!(matches!(
            reg.rename(&mut arena, "A", "   "),
            Err(EditorError::InvalidName)
        ));
        assert!(matches!(
            reg.rename(&mut arena, "B", "C"),
            Err(EditorError::NotFound(_))
        ));
    }
}
