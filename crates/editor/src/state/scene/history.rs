//! Undo/redo functionality

use tracing::warn;

use super::command::{Command, Direction};
use super::entity::EntityArena;
use super::sync::synchronize;
use super::{Scene, SceneState};
use crate::error::{EditorError, EditorResult};

/// Executed and undone command stacks (most recent last).
///
/// A command lives on at most one stack. Every command on a stack holds one
/// arena reference per entity it mentions.
#[derive(Debug, Default)]
pub struct History {
    executed: Vec<Command>,
    undone: Vec<Command>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` executed commands; `None` keeps everything
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Run a new command. On failure nothing is pushed and both stacks are
    /// unchanged.
    pub fn execute(&mut self, command: Command, scene: &mut Scene) -> EditorResult<()> {
        command.execute(&scene.arena, scene.render.as_mut())?;
        for id in command.entities() {
            scene.arena.retain(id);
        }
        synchronize(&command, Direction::Forward, &mut scene.registry, &mut scene.arena);
        self.executed.push(command);
        for dropped in std::mem::take(&mut self.undone) {
            release(&dropped, &mut scene.arena);
        }
        self.enforce_limit(&mut scene.arena);
        Ok(())
    }

    /// Reverse the most recent command.
    ///
    /// The command moves to the undone stack and the registry is reversed
    /// even when the render collaborator rejects part of the undo; that
    /// failure is still returned.
    pub fn undo(&mut self, scene: &mut Scene) -> EditorResult<()> {
        let command = self.executed.pop().ok_or(EditorError::EmptyHistory)?;
        let result = command.undo(&scene.arena, scene.render.as_mut());
        if let Err(e) = &result {
            warn!("undo of {} only partially applied: {e}", command.label());
        }
        synchronize(&command, Direction::Reverse, &mut scene.registry, &mut scene.arena);
        self.undone.push(command);
        result
    }

    /// Re-apply the most recently undone command.
    ///
    /// A rejected redo is rolled back on the render side and the command
    /// stays on the undone stack.
    pub fn redo(&mut self, scene: &mut Scene) -> EditorResult<()> {
        let command = self.undone.pop().ok_or(EditorError::EmptyHistory)?;
        if let Err(e) = command.execute(&scene.arena, scene.render.as_mut()) {
            self.undone.push(command);
            return Err(e);
        }
        synchronize(&command, Direction::Forward, &mut scene.registry, &mut scene.arena);
        self.executed.push(command);
        self.enforce_limit(&mut scene.arena);
        Ok(())
    }

    /// Forget both stacks without running anything
    pub fn clear(&mut self, arena: &mut EntityArena) {
        for command in self.executed.drain(..).chain(self.undone.drain(..)) {
            release(&command, arena);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.executed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.executed.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }

    pub fn executed(&self) -> &[Command] {
        &self.executed
    }

    pub fn undone(&self) -> &[Command] {
        &self.undone
    }

    fn enforce_limit(&mut self, arena: &mut EntityArena) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.executed.len() > limit {
            let excess = self.executed.len() - limit;
            for dropped in self.executed.drain(..excess) {
                release(&dropped, arena);
            }
        }
    }
}

fn release(command: &Command, arena: &mut EntityArena) {
    for id in command.entities() {
        arena.release(id);
    }
}

impl SceneState {
    /// Execute a command through the history
    pub fn execute(&mut self, command: Command) -> EditorResult<()> {
        let label = command.label();
        match self.history.execute(command, &mut self.scene) {
            Ok(()) => {
                tracing::debug!("{label} executed");
                self.version += 1;
                Ok(())
            }
            Err(e) => {
                // entities staged for the rejected command
                self.scene.arena.sweep();
                tracing::debug!("{label} rejected");
                Err(e)
            }
        }
    }

    /// Undo last change
    pub fn undo(&mut self) -> EditorResult<()> {
        let result = self.history.undo(&mut self.scene);
        if matches!(result, Err(EditorError::EmptyHistory)) {
            return result;
        }
        self.version += 1;
        result
    }

    /// Redo last undone change
    pub fn redo(&mut self) -> EditorResult<()> {
        let result = self.history.redo(&mut self.scene);
        if result.is_ok() {
            self.version += 1;
        }
        result
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
