//! Display helper functions for entities and the object browser

use serde::Serialize;

use super::entity::{Entity, EntityId, Geometry};
use super::SceneState;

/// Get display name for an entity
pub fn entity_display_name(entity: &Entity) -> String {
    format!("{} ({})", entity.name, short_id(&entity.id))
}

/// Get icon for a geometry kind
pub fn geometry_icon(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Mesh(_) => "[M]",
        Geometry::Profile(p) if p.closed => "[O]",
        Geometry::Profile(_) => "[~]",
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &EntityId) -> String {
    id.to_string().chars().take(8).collect()
}

/// One row of the object browser
#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub name: String,
    pub id: String,
    pub label: String,
    pub icon: &'static str,
    pub kind: &'static str,
    pub points: usize,
    pub triangles: usize,
}

impl EntityInfo {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.name.clone(),
            id: entity.id.to_string(),
            label: entity_display_name(entity),
            icon: geometry_icon(&entity.geometry),
            kind: entity.geometry.kind(),
            points: entity.geometry.point_count(),
            triangles: entity.geometry.triangle_count(),
        }
    }
}

/// Snapshot of the scene for inspection
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub entities: Vec<EntityInfo>,
    /// `[min, max]` of everything drawn
    pub bounds: Option<[[f32; 3]; 2]>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

impl SceneState {
    /// Browser rows in registry order
    pub fn list(&self) -> Vec<EntityInfo> {
        self.scene
            .registry
            .ids()
            .iter()
            .filter_map(|id| self.scene.arena.get(*id))
            .map(EntityInfo::from_entity)
            .collect()
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            entities: self.list(),
            bounds: self
                .scene
                .render
                .bounds()
                .map(|b| [b.min.to_array(), b.max.to_array()]),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        }
    }
}
