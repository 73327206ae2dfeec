//! Undoable scene commands.
//!
//! A command names the entities it moves in or out of the scene and knows
//! how to replay that on the render collaborator in either direction.
//! Commands hold ids only; the arena keeps the entities alive while any
//! command on a history stack mentions them.

use std::fmt;

use super::entity::{EntityArena, EntityId};
use crate::error::{EditorError, EditorResult};
use crate::viewport::scene::RenderCollaborator;

/// Which way a command is being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// One membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Insert(EntityId),
    Remove(EntityId),
}

impl Step {
    pub fn inverse(self) -> Step {
        match self {
            Step::Insert(id) => Step::Remove(id),
            Step::Remove(id) => Step::Insert(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { entity: EntityId },
    Delete { entity: EntityId },
    Replace { old: EntityId, new: EntityId },
    /// Two operands consumed into one result (boolean)
    Compose {
        result: EntityId,
        operands: [EntityId; 2],
    },
}

impl Command {
    /// Membership changes for one direction, in the order they are applied
    pub fn steps(&self, direction: Direction) -> Vec<Step> {
        use Direction::*;
        use Step::*;
        match (self, direction) {
            (Command::Add { entity }, Forward) => vec![Insert(*entity)],
            (Command::Add { entity }, Reverse) => vec![Remove(*entity)],
            (Command::Delete { entity }, Forward) => vec![Remove(*entity)],
            (Command::Delete { entity }, Reverse) => vec![Insert(*entity)],
            (Command::Replace { old, new }, Forward) => vec![Remove(*old), Insert(*new)],
            (Command::Replace { old, new }, Reverse) => vec![Remove(*new), Insert(*old)],
            (Command::Compose { result, operands: [a, b] }, Forward) => {
                vec![Remove(*a), Remove(*b), Insert(*result)]
            }
            (Command::Compose { result, operands: [a, b] }, Reverse) => {
                vec![Remove(*result), Insert(*a), Insert(*b)]
            }
        }
    }

    /// Every entity the command mentions
    pub fn entities(&self) -> Vec<EntityId> {
        match self {
            Command::Add { entity } | Command::Delete { entity } => vec![*entity],
            Command::Replace { old, new } => vec![*old, *new],
            Command::Compose { result, operands: [a, b] } => vec![*result, *a, *b],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Delete { .. } => "delete",
            Command::Replace { .. } => "replace",
            Command::Compose { .. } => "compose",
        }
    }

    /// Apply forward. On failure the steps already applied are rolled back.
    pub fn execute(
        &self,
        arena: &EntityArena,
        render: &mut dyn RenderCollaborator,
    ) -> EditorResult<()> {
        let steps = self.steps(Direction::Forward);
        for (i, step) in steps.iter().enumerate() {
            if let Err(e) = apply_step(*step, arena, render) {
                for done in steps[..i].iter().rev() {
                    if let Err(rollback) = apply_step(done.inverse(), arena, render) {
                        tracing::warn!("rollback of {} failed: {rollback}", self.label());
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Apply in reverse. Every step is attempted; the first failure is returned.
    pub fn undo(
        &self,
        arena: &EntityArena,
        render: &mut dyn RenderCollaborator,
    ) -> EditorResult<()> {
        let mut first_error = None;
        for step in self.steps(Direction::Reverse) {
            if let Err(e) = apply_step(step, arena, render) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Add { entity } => write!(f, "add {entity}"),
            Command::Delete { entity } => write!(f, "delete {entity}"),
            Command::Replace { old, new } => write!(f, "replace {old} with {new}"),
            Command::Compose { result, operands: [a, b] } => {
                write!(f, "compose {a} and {b} into {result}")
            }
        }
    }
}

fn apply_step(
    step: Step,
    arena: &EntityArena,
    render: &mut dyn RenderCollaborator,
) -> EditorResult<()> {
    match step {
        Step::Insert(id) => {
            let entity = arena
                .get(id)
                .ok_or_else(|| EditorError::rejected(format!("entity {id} no longer exists")))?;
            render.add_entity(entity).map_err(EditorError::CollaboratorRejected)
        }
        Step::Remove(id) => render.remove_entity(id).map_err(EditorError::CollaboratorRejected),
    }
}
