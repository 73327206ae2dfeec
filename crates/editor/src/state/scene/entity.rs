//! Scene entities and the reference-counted arena that owns them.
//!
//! An entity is referenced by the registry while it is live and by every
//! command on either history stack that mentions it. The arena frees an
//! entity once the last of those references is released.

use std::collections::HashMap;
use std::fmt;

use glam::Vec3;
use uuid::Uuid;

use crate::viewport::mesh::{Aabb, MeshData};

/// Stable entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Open or closed polyline drawn on the working plane
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub points: Vec<Vec3>,
    pub closed: bool,
}

impl Profile {
    pub fn new(points: Vec<Vec3>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Segments as point pairs, including the closing one
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.points.len();
        let count = match (n, self.closed) {
            (0 | 1, _) => 0,
            (_, true) => n,
            (_, false) => n - 1,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

/// Opaque geometry payload of an entity
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Mesh(MeshData),
    Profile(Profile),
}

impl Geometry {
    pub fn point_count(&self) -> usize {
        match self {
            Geometry::Mesh(mesh) => mesh.vertex_count(),
            Geometry::Profile(profile) => profile.points.len(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        match self {
            Geometry::Mesh(mesh) => mesh.triangle_count(),
            Geometry::Profile(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Mesh(_) => "mesh",
            Geometry::Profile(_) => "profile",
        }
    }

    /// All points of the payload, in order
    pub fn points(&self) -> Vec<Vec3> {
        match self {
            Geometry::Mesh(mesh) => mesh.positions().collect(),
            Geometry::Profile(profile) => profile.points.clone(),
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Geometry::Mesh(mesh) => Aabb::from_mesh(mesh),
            Geometry::Profile(profile) => Aabb::from_points(profile.points.iter().copied()),
        }
    }

    pub fn as_mesh(&self) -> Option<&MeshData> {
        match self {
            Geometry::Mesh(mesh) => Some(mesh),
            Geometry::Profile(_) => None,
        }
    }
}

/// A named object of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub geometry: Geometry,
}

impl Entity {
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            geometry,
        }
    }
}

// ── Arena ────────────────────────────────────────────────────

struct Slot {
    entity: Entity,
    refs: usize,
}

/// Owner of every entity that is live or referenced by history
#[derive(Default)]
pub struct EntityArena {
    slots: HashMap<EntityId, Slot>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an entity. It starts with no references.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.slots.insert(id, Slot { entity, refs: 0 });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(&id).map(|s| &s.entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Update the display name. Geometry never changes after creation.
    pub(crate) fn set_name(&mut self, id: EntityId, name: String) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.entity.name = name;
        }
    }

    pub fn retain(&mut self, id: EntityId) {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.refs += 1;
        }
    }

    /// Drop one reference. Returns true if the entity was freed.
    pub fn release(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.slots.get_mut(&id) else {
            return false;
        };
        slot.refs = slot.refs.saturating_sub(1);
        if slot.refs == 0 {
            self.slots.remove(&id);
            tracing::debug!("entity {id} freed");
            return true;
        }
        false
    }

    pub fn ref_count(&self, id: EntityId) -> usize {
        self.slots.get(&id).map_or(0, |s| s.refs)
    }

    /// Free entities nobody references (left behind by a rejected command)
    pub fn sweep(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.refs > 0);
        before - self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(points: &[[f32; 3]], closed: bool) -> Geometry {
        Geometry::Profile(Profile::new(
            points.iter().map(|p| Vec3::from_array(*p)).collect(),
            closed,
        ))
    }

    #[test]
    fn release_frees_at_zero() {
        let mut arena = EntityArena::new();
        let id = arena.insert(Entity::new("A", profile(&[[0.0; 3]], false)));
        arena.retain(id);
        arena.retain(id);
        assert_eq!(arena.ref_count(id), 2);
        assert!(!arena.release(id));
        assert!(arena.release(id));
        assert!(!arena.contains(id));
    }

    #[test]
    fn sweep_drops_unreferenced() {
        let mut arena = EntityArena::new();
        let kept = arena.insert(Entity::new("A", profile(&[[0.0; 3]], false)));
        arena.retain(kept);
        arena.insert(Entity::new("B", profile(&[[1.0; 3]], false)));
        assert_eq!(arena.sweep(), 1);
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(kept));
    }

    #[test]
    fn profile_segments_close_the_loop() {
        let square = Profile::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            true,
        );
        assert_eq!(square.segments().count(), 4);
        assert!((square.length() - 4.0).abs() < 1e-6);

        let open = Profile::new(square.points.clone(), false);
        assert_eq!(open.segments().count(), 3);
    }

    #[test]
    fn empty_geometry() {
        assert!(profile(&[], false).is_empty());
        assert!(Geometry::Mesh(MeshData::default()).is_empty());
        assert_eq!(profile(&[[0.0; 3], [1.0; 3]], false).point_count(), 2);
    }
}
