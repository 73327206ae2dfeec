//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps an [`EditorState`] with shorthand constructors and lockstep checks.
//! [`ScriptedRender`] is a render collaborator that can be told to reject
//! particular adds or removes, for exercising failure paths.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use shared::{Primitive, Shape2D};

use crate::build::MeshKernel;
use crate::codec::StlCodec;
use crate::error::EditorResult;
use crate::state::scene::{Entity, EntityId};
use crate::state::{EditorSettings, EditorState};
use crate::validation::MeshValidator;
use crate::viewport::mesh::Aabb;
use crate::viewport::scene::{RenderCollaborator, RenderScene};

// ── Scripted render collaborator ──────────────────────────────

#[derive(Debug, Default)]
struct Faults {
    adds: HashSet<String>,
    removes: HashSet<String>,
}

/// Handle that switches [`ScriptedRender`] faults on and off by entity name
#[derive(Debug, Clone, Default)]
pub struct RenderFaults(Rc<RefCell<Faults>>);

impl RenderFaults {
    pub fn reject_add(&self, name: &str) {
        self.0.borrow_mut().adds.insert(name.to_string());
    }

    pub fn reject_remove(&self, name: &str) {
        self.0.borrow_mut().removes.insert(name.to_string());
    }

    pub fn allow_all(&self) {
        let mut faults = self.0.borrow_mut();
        faults.adds.clear();
        faults.removes.clear();
    }
}

/// Render scene that fails on request
#[derive(Debug, Default)]
pub struct ScriptedRender {
    inner: RenderScene,
    names: HashMap<EntityId, String>,
    faults: RenderFaults,
}

impl ScriptedRender {
    pub fn with_faults() -> (Self, RenderFaults) {
        let render = Self::default();
        let faults = render.faults.clone();
        (render, faults)
    }
}

impl RenderCollaborator for ScriptedRender {
    fn add_entity(&mut self, entity: &Entity) -> Result<(), String> {
        if self.faults.0.borrow().adds.contains(&entity.name) {
            return Err(format!("renderer refused to add '{}'", entity.name));
        }
        self.inner.add_entity(entity)?;
        self.names.insert(entity.id, entity.name.clone());
        Ok(())
    }

    fn remove_entity(&mut self, id: EntityId) -> Result<(), String> {
        if let Some(name) = self.names.get(&id) {
            if self.faults.0.borrow().removes.contains(name) {
                return Err(format!("renderer refused to remove '{name}'"));
            }
        }
        self.inner.remove_entity(id)?;
        self.names.remove(&id);
        Ok(())
    }

    fn contains(&self, id: EntityId) -> bool {
        self.inner.contains(id)
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.inner.entity_ids()
    }

    fn remove_all(&mut self) {
        self.inner.remove_all();
        self.names.clear();
    }

    fn bounds(&self) -> Option<Aabb> {
        self.inner.bounds()
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Headless editor for tests and scripts
pub struct TestHarness {
    pub editor: EditorState,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self {
            editor: EditorState::new(EditorSettings::default()),
        }
    }

    /// Harness whose renderer can be told to fail
    pub fn with_faults() -> (Self, RenderFaults) {
        Self::with_faults_and_settings(EditorSettings::default())
    }

    pub fn with_faults_and_settings(settings: EditorSettings) -> (Self, RenderFaults) {
        let (render, faults) = ScriptedRender::with_faults();
        let editor = EditorState::with_collaborators(
            settings,
            Box::new(render),
            Box::new(MeshKernel::default()),
            Box::new(StlCodec),
        );
        (Self { editor }, faults)
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Create a cube and return its assigned name
    pub fn create_cube(&mut self, name: &str, size: f64) -> EditorResult<String> {
        self.editor
            .create_primitive(&Primitive::Cube { size }, Some(name))
    }

    pub fn create_sphere(&mut self, name: &str, radius: f64) -> EditorResult<String> {
        self.editor.create_primitive(
            &Primitive::Sphere {
                radius,
                resolution: 16,
            },
            Some(name),
        )
    }

    pub fn create_rectangle(&mut self, name: &str, width: f64, height: f64) -> EditorResult<String> {
        self.editor
            .create_shape(&Shape2D::Rectangle { width, height }, Some(name))
    }

    pub fn create_circle(&mut self, name: &str, radius: f64) -> EditorResult<String> {
        self.editor.create_shape(
            &Shape2D::Circle {
                radius,
                resolution: 24,
            },
            Some(name),
        )
    }

    pub fn create_line(&mut self, name: &str, from: (f64, f64), to: (f64, f64)) -> EditorResult<String> {
        self.editor.create_shape(
            &Shape2D::Line {
                x1: from.0,
                y1: from.1,
                x2: to.0,
                y2: to.1,
            },
            Some(name),
        )
    }

    pub fn delete(&mut self, name: &str) -> EditorResult<()> {
        self.editor.delete(name)
    }

    /// Undo the last operation; false when it failed or nothing was undone
    pub fn undo(&mut self) -> bool {
        self.editor.undo().is_ok()
    }

    /// Redo the last undone operation; false when it failed or nothing was redone
    pub fn redo(&mut self) -> bool {
        self.editor.redo().is_ok()
    }

    /// Undo everything; returns the number of successful undos
    pub fn undo_all(&mut self) -> usize {
        let mut n = 0;
        while self.editor.scene.can_undo() {
            if self.undo() {
                n += 1;
            }
        }
        n
    }

    pub fn redo_all(&mut self) -> usize {
        let mut n = 0;
        while self.editor.scene.can_redo() {
            if !self.redo() {
                break;
            }
            n += 1;
        }
        n
    }

    // ── Inspection ────────────────────────────────────────────

    /// Live names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names = self.editor.scene.names();
        names.sort();
        names
    }

    pub fn entity_count(&self) -> usize {
        self.editor.scene.len()
    }

    /// Registry and renderer hold the same entities
    pub fn in_lockstep(&self) -> bool {
        self.editor.scene.scene().in_lockstep()
    }

    /// Live entity id by name
    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.editor.scene.registry().find(name).ok()
    }

    pub fn is_drawn(&self, name: &str) -> bool {
        self.id_of(name)
            .is_some_and(|id| self.editor.scene.render().contains(id))
    }

    /// Create a validator for an entity's mesh
    pub fn validate_mesh(&self, name: &str) -> Option<MeshValidator<'_>> {
        self.editor
            .scene
            .get(name)
            .and_then(|e| e.geometry.as_mesh())
            .map(MeshValidator::new)
    }
}
