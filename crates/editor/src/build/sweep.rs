//! Extrude, revolve, sweep and loft by ring stitching.
//!
//! Used for open profiles (which sweep into surfaces), for closed profiles
//! manifold cannot take directly, and for every sweep and loft. Every operation places copies ("rings") of a profile along some motion
//! and joins consecutive rings with quads. Closed profiles get fan caps on
//! open ends. The result is reoriented so a closed result has outward
//! winding.

use glam::{Quat, Vec3};

use crate::state::scene::{Geometry, Profile};
use crate::viewport::mesh::MeshData;

/// A profile with fewer points cannot be closed
const MIN_CLOSED_POINTS: usize = 3;

// ── Extrude ─────────────────────────────────────────────────

pub fn extrude(profile: &Profile, offset: Vec3) -> Geometry {
    let top: Vec<Vec3> = profile.points.iter().map(|p| *p + offset).collect();
    loft_rings(vec![profile.points.clone(), top], is_closed(profile), false, true)
}

// ── Revolve ─────────────────────────────────────────────────

/// Revolve about the Y axis. A full turn wraps the last ring onto the first.
pub fn revolve(profile: &Profile, angle_deg: f32, resolution: u32) -> Geometry {
    let full = angle_deg >= 360.0 - 1e-3;
    let angle = angle_deg.min(360.0).to_radians();
    let steps = if full {
        resolution.max(3)
    } else {
        ((resolution as f32 * angle_deg / 360.0).ceil() as u32).max(1)
    };
    let ring_count = if full { steps } else { steps + 1 };
    let rings = (0..ring_count)
        .map(|k| {
            let rotation = Quat::from_rotation_y(angle * k as f32 / steps as f32);
            profile.points.iter().map(|p| rotation * *p).collect()
        })
        .collect();
    loft_rings(rings, is_closed(profile), full, !full)
}

// ── Sweep ───────────────────────────────────────────────────

/// Translate the profile along every vertex of `path`
pub fn sweep(profile: &Profile, path: &Profile) -> Geometry {
    let start = path.points[0];
    let rings = path
        .points
        .iter()
        .map(|p| {
            let offset = *p - start;
            profile.points.iter().map(|q| *q + offset).collect()
        })
        .collect();
    let wrap = is_closed(path);
    loft_rings(rings, is_closed(profile), wrap, !wrap)
}

// ── Loft ────────────────────────────────────────────────────

/// Ruled surface through profiles resampled to `resolution` points each
pub fn loft(profiles: &[&Profile], resolution: usize) -> Geometry {
    if profiles.iter().all(|p| p.points.len() == 1) {
        let points = profiles.iter().map(|p| p.points[0]).collect();
        return Geometry::Profile(Profile::new(points, false));
    }
    let closed = profiles.iter().all(|p| is_closed(p));
    let rings = profiles
        .iter()
        .map(|p| resample(p, resolution.max(3), closed))
        .collect();
    loft_rings(rings, closed, false, false)
}

/// `n` points spaced evenly by arc length
pub fn resample(profile: &Profile, n: usize, closed: bool) -> Vec<Vec3> {
    let points = &profile.points;
    if points.len() == 1 {
        return vec![points[0]; n];
    }
    let ring = Profile::new(points.clone(), closed && points.len() >= MIN_CLOSED_POINTS);
    let segments: Vec<(Vec3, Vec3)> = ring.segments().collect();
    let total = ring.length();
    if total <= f32::EPSILON {
        return vec![points[0]; n];
    }
    let divisions = if ring.closed { n } else { n - 1 };
    (0..n)
        .map(|i| {
            let mut target = total * i as f32 / divisions as f32;
            for (a, b) in &segments {
                let len = a.distance(*b);
                if len > 0.0 && target <= len {
                    return a.lerp(*b, target / len);
                }
                target -= len;
            }
            segments.last().map_or(points[0], |(_, b)| *b)
        })
        .collect()
}

// ── Stitching ───────────────────────────────────────────────

fn is_closed(profile: &Profile) -> bool {
    profile.closed && profile.points.len() >= MIN_CLOSED_POINTS
}

/// Join consecutive rings. Single-point rings give a polyline profile.
fn loft_rings(rings: Vec<Vec<Vec3>>, closed: bool, wrap: bool, caps: bool) -> Geometry {
    let n = rings.first().map_or(0, Vec::len);
    if n == 0 || rings.len() < 2 {
        return Geometry::Profile(Profile::default());
    }
    if n == 1 {
        let points = rings.into_iter().map(|r| r[0]).collect();
        return Geometry::Profile(Profile::new(points, wrap));
    }

    let segment_count = if closed { n } else { n - 1 };
    let ring_pairs = if wrap { rings.len() } else { rings.len() - 1 };
    let mut triangles = Vec::new();
    for k in 0..ring_pairs {
        let lower = &rings[k];
        let upper = &rings[(k + 1) % rings.len()];
        for i in 0..segment_count {
            let j = (i + 1) % n;
            let (a, b, c, d) = (lower[i], lower[j], upper[j], upper[i]);
            triangles.push([a, b, c]);
            triangles.push([a, c, d]);
        }
    }

    if closed && caps {
        let first = &rings[0];
        let last = &rings[rings.len() - 1];
        for i in 1..n - 1 {
            triangles.push([first[0], first[i + 1], first[i]]);
            triangles.push([last[0], last[i], last[i + 1]]);
        }
    }

    Geometry::Mesh(orient_outward(triangles))
}

/// Flip all triangles if the enclosed signed volume is negative
fn orient_outward(mut triangles: Vec<[Vec3; 3]>) -> MeshData {
    let volume: f32 = triangles.iter().map(|[a, b, c]| a.dot(b.cross(*c))).sum();
    if volume < 0.0 {
        for tri in &mut triangles {
            tri.swap(1, 2);
        }
    }
    MeshData::from_triangles(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MeshValidator;

    fn square() -> Profile {
        Profile::new(
            vec![
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            true,
        )
    }

    fn mesh(g: Geometry) -> MeshData {
        match g {
            Geometry::Mesh(m) => m,
            other => panic!("expected mesh, got {}", other.kind()),
        }
    }

    fn signed_volume(m: &MeshData) -> f32 {
        m.triangles().map(|[a, b, c]| a.dot(b.cross(c))).sum::<f32>() / 6.0
    }

    #[test]
    fn extruded_square_is_closed_box() {
        let m = mesh(extrude(&square(), Vec3::Z * 2.0));
        let v = MeshValidator::new(&m);
        assert!(v.is_watertight());
        assert!(v.assert_dimensions_approx([1.0, 1.0, 2.0], 1e-5));
        assert!((signed_volume(&m) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn extruded_line_is_open_strip() {
        let line = Profile::new(vec![Vec3::ZERO, Vec3::X], false);
        let m = mesh(extrude(&line, Vec3::Z));
        assert_eq!(m.triangle_count(), 2);
        assert!(!MeshValidator::new(&m).is_watertight());
    }

    #[test]
    fn extruded_point_is_segment() {
        let point = Profile::new(vec![Vec3::ZERO], false);
        match extrude(&point, Vec3::Z) {
            Geometry::Profile(p) => assert_eq!(p.points, vec![Vec3::ZERO, Vec3::Z]),
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn full_revolve_is_torus_like_and_closed() {
        let m = mesh(revolve(&square(), 360.0, 24));
        let v = MeshValidator::new(&m);
        assert!(v.is_watertight());
        assert!(signed_volume(&m) > 0.0);
    }

    #[test]
    fn partial_revolve_has_caps() {
        let m = mesh(revolve(&square(), 90.0, 60));
        assert!(MeshValidator::new(&m).is_watertight());
    }

    #[test]
    fn sweep_along_polyline() {
        let path = Profile::new(vec![Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 1.0, 2.0)], false);
        let m = mesh(sweep(&square(), &path));
        assert!(MeshValidator::new(&m).is_watertight());
    }

    #[test]
    fn loft_between_circle_and_square() {
        let circle = crate::build::shapes::outline(&shared::Shape2D::Circle {
            radius: 1.0,
            resolution: 16,
        });
        let mut lifted = square();
        for p in &mut lifted.points {
            p.z = 3.0;
        }
        let m = mesh(loft(&[&circle, &lifted], 30));
        assert_eq!(m.triangle_count(), 60);
    }

    #[test]
    fn resample_open_endpoints() {
        let line = Profile::new(vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)], false);
        let pts = resample(&line, 5, false);
        assert_eq!(pts.len(), 5);
        assert!((pts[1].x - 1.0).abs() < 1e-6);
        assert!((pts[4].x - 4.0).abs() < 1e-6);
    }
}
