//! Geometry kernel: the seam to whatever engine produces geometry.
//!
//! The editor asks a [`GeometryKernel`] for primitives, shape outlines and
//! mesh operations. [`MeshKernel`] is the built-in implementation: solids
//! come from manifold-rs (see [`csg`]), open profiles are swept into
//! surfaces by ring stitching (see [`sweep`]).

pub mod csg;
mod primitives;
pub mod shapes;
pub mod sweep;

pub use primitives::tessellate;

use glam::Vec3;
use shared::{BooleanOp, Primitive, Shape2D};

use crate::state::scene::{Geometry, Profile};
use crate::validation::MeshValidator;

pub const DEFAULT_REVOLVE_RESOLUTION: u32 = 60;
pub const DEFAULT_LOFT_RESOLUTION: usize = 30;

pub const NOT_WATERTIGHT: &str =
    "One or both meshes are not watertight or have non-manifold edges after sanitization.";
pub const EMPTY_RESULT: &str =
    "Result was empty. Meshes may not intersect or the intersection may be ambiguous.";

/// Geometry engine interface. Errors are human-readable reasons.
pub trait GeometryKernel {
    fn primitive(&self, primitive: &Primitive) -> Result<Geometry, String>;

    /// Outline of a 2D shape on the local XY plane
    fn shape(&self, shape: &Shape2D) -> Result<Profile, String>;

    fn extrude(&self, profile: &Geometry, length: f32, direction: Vec3) -> Result<Geometry, String>;

    fn revolve(&self, profile: &Geometry, angle_deg: f32) -> Result<Geometry, String>;

    fn sweep(&self, profile: &Geometry, path: &Geometry) -> Result<Geometry, String>;

    fn loft(&self, profiles: &[&Geometry]) -> Result<Geometry, String>;

    fn boolean(&self, a: &Geometry, b: &Geometry, op: BooleanOp) -> Result<Geometry, String>;
}

/// Built-in tessellating kernel
#[derive(Debug, Clone)]
pub struct MeshKernel {
    pub revolve_resolution: u32,
    pub loft_resolution: usize,
}

impl Default for MeshKernel {
    fn default() -> Self {
        Self {
            revolve_resolution: DEFAULT_REVOLVE_RESOLUTION,
            loft_resolution: DEFAULT_LOFT_RESOLUTION,
        }
    }
}

impl MeshKernel {
    pub fn new(revolve_resolution: u32) -> Self {
        Self {
            revolve_resolution,
            ..Self::default()
        }
    }
}

fn as_profile<'a>(geometry: &'a Geometry, what: &str) -> Result<&'a Profile, String> {
    match geometry {
        Geometry::Profile(p) if !p.points.is_empty() => Ok(p),
        Geometry::Profile(_) => Err(format!("Input {what} is empty.")),
        Geometry::Mesh(_) => Err(format!("Input {what} must be a profile, not a mesh.")),
    }
}

impl GeometryKernel for MeshKernel {
    fn primitive(&self, primitive: &Primitive) -> Result<Geometry, String> {
        Ok(Geometry::Mesh(tessellate(primitive)))
    }

    fn shape(&self, shape: &Shape2D) -> Result<Profile, String> {
        Ok(shapes::outline(shape))
    }

    fn extrude(&self, profile: &Geometry, length: f32, direction: Vec3) -> Result<Geometry, String> {
        let profile = as_profile(profile, "profile for extrusion")?;
        let direction = direction.try_normalize().ok_or("Extrusion direction is zero.")?;
        if let Some(solid) = csg::extrude(profile, length, direction) {
            return Ok(Geometry::Mesh(solid));
        }
        Ok(sweep::extrude(profile, direction * length))
    }

    fn revolve(&self, profile: &Geometry, angle_deg: f32) -> Result<Geometry, String> {
        let profile = as_profile(profile, "profile for revolution")?;
        if let Some(solid) = csg::revolve(profile, angle_deg, self.revolve_resolution) {
            return Ok(Geometry::Mesh(solid));
        }
        Ok(sweep::revolve(profile, angle_deg, self.revolve_resolution))
    }

    fn sweep(&self, profile: &Geometry, path: &Geometry) -> Result<Geometry, String> {
        let profile = as_profile(profile, "profile for sweep")?;
        let path = as_profile(path, "path for sweep")?;
        if path.points.len() < 2 {
            return Err("Sweep path needs at least two points.".into());
        }
        Ok(sweep::sweep(profile, path))
    }

    fn loft(&self, profiles: &[&Geometry]) -> Result<Geometry, String> {
        if profiles.len() < 2 {
            return Err("Loft requires at least two profiles.".into());
        }
        let mut valid = Vec::new();
        for geometry in profiles {
            match geometry {
                Geometry::Profile(p) if !p.points.is_empty() => valid.push(p),
                Geometry::Profile(_) => {}
                Geometry::Mesh(_) => return Err("Loft inputs must be profiles.".into()),
            }
        }
        match valid.len() {
            0 => Err("None of the selected profiles contain valid geometry.".into()),
            1 => Err("Loft requires at least two profiles.".into()),
            _ => Ok(sweep::loft(&valid, self.loft_resolution)),
        }
    }

    fn boolean(&self, a: &Geometry, b: &Geometry, op: BooleanOp) -> Result<Geometry, String> {
        let (Some(ma), Some(mb)) = (a.as_mesh(), b.as_mesh()) else {
            return Err(NOT_WATERTIGHT.into());
        };
        if !MeshValidator::new(ma).is_watertight() || !MeshValidator::new(mb).is_watertight() {
            return Err(NOT_WATERTIGHT.into());
        }
        let (Some(sa), Some(sb)) = (csg::to_manifold(ma), csg::to_manifold(mb)) else {
            return Err(NOT_WATERTIGHT.into());
        };
        csg::from_manifold(&csg::boolean(&sa, &sb, op), glam::Affine3A::IDENTITY)
            .map(Geometry::Mesh)
            .ok_or_else(|| EMPTY_RESULT.into())
    }
}
