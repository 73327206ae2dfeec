//! Keeps the registry in lockstep with the render scene.
//!
//! After a command is executed or reversed the same membership table is
//! replayed onto the registry. Registry membership holds one arena
//! reference per live entity.

use tracing::warn;

use super::command::{Command, Direction, Step};
use super::entity::{EntityArena, EntityId};
use super::registry::Registry;
use crate::error::EditorError;

/// Replay `command` in `direction` onto the registry.
///
/// A re-inserted entity whose name was taken in the meantime (renames are
/// not undoable) is given the next free suffixed name. Returns the
/// `(old, new)` pairs of such renames.
pub(crate) fn synchronize(
    command: &Command,
    direction: Direction,
    registry: &mut Registry,
    arena: &mut EntityArena,
) -> Vec<(String, String)> {
    let mut renamed = Vec::new();
    for step in command.steps(direction) {
        match step {
            Step::Remove(id) => {
                if registry.remove(id) {
                    arena.release(id);
                }
            }
            Step::Insert(id) => {
                if let Some(pair) = insert(id, registry, arena) {
                    renamed.push(pair);
                }
            }
        }
    }
    renamed
}

fn insert(
    id: EntityId,
    registry: &mut Registry,
    arena: &mut EntityArena,
) -> Option<(String, String)> {
    if registry.contains(id) {
        return None;
    }
    let entity = match arena.get(id) {
        Some(e) => e,
        None => {
            warn!("entity {id} vanished before it could be registered");
            return None;
        }
    };
    match registry.insert(entity) {
        Ok(()) => {
            arena.retain(id);
            None
        }
        Err(EditorError::DuplicateName(taken)) => {
            let fresh = registry.unique_name(&taken);
            arena.set_name(id, fresh.clone());
            let entity = arena.get(id)?;
            if let Err(e) = registry.insert(entity) {
                warn!("could not register '{fresh}': {e}");
                return None;
            }
            arena.retain(id);
            warn!("'{taken}' is in use, restored object renamed to '{fresh}'");
            Some((taken, fresh))
        }
        Err(e) => {
            warn!("could not register '{}': {e}", entity.name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scene::entity::{Entity, Geometry, Profile};

    fn spawn(arena: &mut EntityArena, name: &str) -> EntityId {
        let id = arena.insert(Entity::new(
            name,
            Geometry::Profile(Profile::new(vec![glam::Vec3::ZERO], false)),
        ));
        // held by a history command
        arena.retain(id);
        id
    }

    #[test]
    fn forward_then_reverse_restores_registry() {
        let mut arena = EntityArena::new();
        let mut registry = Registry::new();
        let a = spawn(&mut arena, "A");
        let b = spawn(&mut arena, "B");
        let r = spawn(&mut arena, "R");
        let add_a = Command::Add { entity: a };
        let add_b = Command::Add { entity: b };
        synchronize(&add_a, Direction::Forward, &mut registry, &mut arena);
        synchronize(&add_b, Direction::Forward, &mut registry, &mut arena);
        assert_eq!(arena.ref_count(a), 2);

        let compose = Command::Compose { result: r, operands: [a, b] };
        synchronize(&compose, Direction::Forward, &mut registry, &mut arena);
        assert_eq!(registry.names(), vec!["R"]);
        assert_eq!(arena.ref_count(a), 1);

        synchronize(&compose, Direction::Reverse, &mut registry, &mut arena);
        assert_eq!(registry.names(), vec!["A", "B"]);
        assert_eq!(registry.find("A").unwrap(), a);
        assert_eq!(arena.ref_count(r), 1);
    }

    #[test]
    fn collision_on_reinsert_is_suffixed() {
        let mut arena = EntityArena::new();
        let mut registry = Registry::new();
        let a = spawn(&mut arena, "Cube");
        let b = spawn(&mut arena, "Other");
        synchronize(&Command::Add { entity: a }, Direction::Forward, &mut registry, &mut arena);
        synchronize(&Command::Add { entity: b }, Direction::Forward, &mut registry, &mut arena);

        let delete = Command::Delete { entity: a };
        synchronize(&delete, Direction::Forward, &mut registry, &mut arena);
        registry.rename(&mut arena, "Other", "Cube").unwrap();

        let renamed = synchronize(&delete, Direction::Reverse, &mut registry, &mut arena);
        assert_eq!(renamed, vec![("Cube".to_string(), "Cube_1".to_string())]);
        assert_eq!(registry.find("Cube_1").unwrap(), a);
        assert_eq!(arena.get(a).unwrap().name, "Cube_1");
    }
}
