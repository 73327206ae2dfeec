//! Working plane for 2D shapes

use glam::{Affine3A, Quat, Vec3};

use crate::error::{EditorError, EditorResult};

/// Plane that 2D shapes are drawn on. Inactive means the world XY plane.
#[derive(Debug, Clone, Default)]
pub struct WorkingPlane {
    origin: Vec3,
    normal: Vec3,
    transform: Option<Affine3A>,
}

impl WorkingPlane {
    /// Define the plane by a point and a normal. The local XY plane (z = 0)
    /// is rotated so +Z meets the normal, then moved to the origin.
    pub fn set_from_origin_normal(&mut self, origin: Vec3, normal: Vec3) -> EditorResult<()> {
        let normal = normal
            .try_normalize()
            .ok_or_else(|| EditorError::InvalidPlane("Plane normal cannot be a zero vector.".into()))?;
        if !origin.is_finite() {
            return Err(EditorError::InvalidPlane("Plane origin must be finite.".into()));
        }
        let rotation = Quat::from_rotation_arc(Vec3::Z, normal);
        self.origin = origin;
        self.normal = normal;
        self.transform = Some(Affine3A::from_rotation_translation(rotation, origin));
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.transform.is_some()
    }

    pub fn transform(&self) -> Option<Affine3A> {
        self.transform
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Plane normal; +Z when inactive
    pub fn normal(&self) -> Vec3 {
        if self.is_active() {
            self.normal
        } else {
            Vec3::Z
        }
    }

    /// Map a point from plane coordinates to world coordinates
    pub fn map_point(&self, p: Vec3) -> Vec3 {
        match self.transform {
            Some(t) => t.transform_point3(p),
            None => p,
        }
    }
}
