//! Solid operations on manifold-rs.
//!
//! Closed profiles are extruded and revolved with `Manifold::extrude` and
//! `Manifold::revolve`, booleans go through `Manifold::union`/`difference`/
//! `intersection`. Profiles are flattened into a local 2D frame first, and
//! results are mapped back to world space while extracting `MeshData`.

use glam::{Affine3A, Mat3, Vec3};
use manifold_rs::{Manifold, Mesh};
use shared::BooleanOp;

use crate::state::scene::Profile;
use crate::validation::MeshValidator;
use crate::viewport::mesh::MeshData;

/// Out-of-plane distance tolerated for a planar profile
const PLANAR_EPSILON: f32 = 1e-4;

/// Fewer points enclose no area
const MIN_POLYGON_POINTS: usize = 3;

// ── Conversion ──────────────────────────────────────────────

/// Weld a mesh and hand it to manifold. `None` if manifold rejects it.
pub fn to_manifold(mesh: &MeshData) -> Option<Manifold> {
    let (points, triangles) = MeshValidator::new(mesh).welded();
    if triangles.is_empty() {
        return None;
    }
    let vertices: Vec<f32> = points.iter().flat_map(|p| p.to_array()).collect();
    let indices: Vec<u32> = triangles.iter().flatten().map(|&i| i as u32).collect();

    let manifold = Mesh::new(&vertices, &indices).to_manifold();
    (!manifold.is_empty()).then_some(manifold)
}

/// Extract flat-shaded mesh data, mapping every position through `transform`
pub fn from_manifold(manifold: &Manifold, transform: Affine3A) -> Option<MeshData> {
    if manifold.is_empty() {
        return None;
    }
    let mesh = manifold.to_mesh();
    let stride = (mesh.num_props() as usize).max(3);
    let positions = mesh.vertices();
    let indices = mesh.indices();

    tracing::debug!(
        "from_manifold: {} vertices, {} tris",
        positions.len() / stride,
        indices.len() / 3
    );

    let position = |i: u32| {
        let base = i as usize * stride;
        positions
            .get(base..base + 3)
            .map(|p| transform.transform_point3(Vec3::from_slice(p)))
    };
    let triangles: Vec<[Vec3; 3]> = indices
        .chunks_exact(3)
        .filter_map(|t| Some([position(t[0])?, position(t[1])?, position(t[2])?]))
        .collect();

    if triangles.is_empty() {
        return None;
    }
    Some(MeshData::from_triangles(triangles))
}

// ── Operations ──────────────────────────────────────────────

pub fn boolean(a: &Manifold, b: &Manifold, op: BooleanOp) -> Manifold {
    match op {
        BooleanOp::Union => a.union(b),
        BooleanOp::Difference => a.difference(b),
        BooleanOp::Intersection => a.intersection(b),
    }
}

/// Extrude a closed profile lying in the plane normal to `direction`.
/// `None` when the profile is open, non-planar or oblique to `direction`.
pub fn extrude(profile: &Profile, length: f32, direction: Vec3) -> Option<MeshData> {
    if !encloses_area(profile) {
        return None;
    }
    let origin = profile.points[0];
    if profile
        .points
        .iter()
        .any(|p| (*p - origin).dot(direction).abs() > PLANAR_EPSILON)
    {
        return None;
    }

    // Local frame: profile in XY, extrusion along +Z
    let u = direction.any_orthonormal_vector();
    let v = direction.cross(u);
    let polygon = polygon_data(profile.points.iter().map(|p| {
        let d = *p - origin;
        [d.dot(u) as f64, d.dot(v) as f64]
    }));

    let manifold = Manifold::extrude(&[polygon.as_slice()], length as f64, 1, 0.0, 1.0, 1.0);
    if manifold.is_empty() {
        tracing::warn!("Manifold::extrude returned empty geometry");
        return None;
    }
    from_manifold(
        &manifold,
        Affine3A::from_mat3_translation(Mat3::from_cols(u, v, direction), origin),
    )
}

/// Revolve a closed profile on the XY plane about the Y axis.
/// `None` when the profile is open, off the plane or crosses the axis.
pub fn revolve(profile: &Profile, angle_deg: f32, segments: u32) -> Option<MeshData> {
    if !encloses_area(profile) {
        return None;
    }
    if profile
        .points
        .iter()
        .any(|p| p.z.abs() > PLANAR_EPSILON || p.x < -PLANAR_EPSILON)
    {
        return None;
    }

    // Manifold takes (radius, height) and revolves about its Z axis
    let polygon = polygon_data(profile.points.iter().map(|p| [p.x.max(0.0) as f64, p.y as f64]));

    let manifold = Manifold::revolve(&[polygon.as_slice()], segments, angle_deg.min(360.0) as f64);
    if manifold.is_empty() {
        tracing::warn!("Manifold::revolve returned empty geometry");
        return None;
    }
    // Manifold X stays X, Manifold Y becomes -Z, Manifold Z becomes Y
    let to_world = Mat3::from_cols(Vec3::X, Vec3::NEG_Z, Vec3::Y);
    from_manifold(&manifold, Affine3A::from_mat3(to_world))
}

fn encloses_area(profile: &Profile) -> bool {
    profile.closed && profile.points.len() >= MIN_POLYGON_POINTS
}

/// Flat `[x0, y0, x1, y1, ..]` with counter-clockwise winding
fn polygon_data(points: impl Iterator<Item = [f64; 2]>) -> Vec<f64> {
    let mut pts: Vec<[f64; 2]> = points.collect();
    let doubled_area: f64 = pts
        .iter()
        .zip(pts.iter().cycle().skip(1))
        .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
        .sum();
    if doubled_area < 0.0 {
        pts.reverse();
    }
    pts.iter().flat_map(|p| [p[0], p[1]]).collect()
}
