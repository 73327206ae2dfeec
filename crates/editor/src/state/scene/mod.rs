//! Scene state management
//!
//! Entities live in a reference-counted arena. The registry indexes the live
//! ones by name, the render collaborator draws them, and undoable commands
//! move entities in and out of both through the history.

mod command;
mod display;
mod entity;
mod entity_ops;
mod history;
mod persistence;
mod registry;
mod sync;

pub use command::{Command, Direction, Step};
pub use display::{entity_display_name, geometry_icon, short_id, EntityInfo, SceneSummary};
pub use entity::{Entity, EntityArena, EntityId, Geometry, Profile};
pub use history::History;
pub use registry::Registry;

use crate::viewport::scene::{RenderCollaborator, RenderScene};

/// Everything a command touches: the arena, the registry and the renderer
pub struct Scene {
    pub arena: EntityArena,
    pub registry: Registry,
    pub render: Box<dyn RenderCollaborator>,
}

impl Scene {
    pub fn new(render: Box<dyn RenderCollaborator>) -> Self {
        Self {
            arena: EntityArena::new(),
            registry: Registry::new(),
            render,
        }
    }

    /// Registry and render membership agree
    pub fn in_lockstep(&self) -> bool {
        let mut live = self.registry.ids().to_vec();
        let mut drawn = self.render.entity_ids();
        live.sort();
        drawn.sort();
        live == drawn
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Box::new(RenderScene::new()))
    }
}

/// Scene with undo/redo history
#[derive(Default)]
pub struct SceneState {
    pub(crate) scene: Scene,
    pub(crate) history: History,
    /// Default-name counter (`Mesh_{n}`)
    pub(crate) counter: usize,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl SceneState {
    pub fn new(render: Box<dyn RenderCollaborator>) -> Self {
        Self {
            scene: Scene::new(render),
            history: History::new(),
            counter: 0,
            version: 0,
        }
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history = History::with_limit(limit);
        self
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get a live entity by name
    pub fn get(&self, name: &str) -> Option<&Entity> {
        let id = self.scene.registry.find(name).ok()?;
        self.scene.arena.get(id)
    }

    /// Get any entity still held by the scene or the history
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.scene.arena.get(id)
    }

    /// Live names in browser order
    pub fn names(&self) -> Vec<String> {
        self.scene.registry.names()
    }

    pub fn len(&self) -> usize {
        self.scene.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.registry.is_empty()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn registry(&self) -> &Registry {
        &self.scene.registry
    }

    pub fn arena(&self) -> &EntityArena {
        &self.scene.arena
    }

    pub fn render(&self) -> &dyn RenderCollaborator {
        self.scene.render.as_ref()
    }
}
