//! Mesh validation utilities.
//!
//! `MeshValidator` provides methods to check mesh data integrity:
//! correct stride, in-range indices, normalized normals, AABB dimensions,
//! and the closed-manifold check booleans require.

use std::collections::HashMap;

use glam::{I64Vec3, Vec3};

use crate::viewport::mesh::{Aabb, MeshData, STRIDE};

/// Positions closer than this are welded for topology checks
const WELD_EPSILON: f32 = 1e-5;

/// Validator for `MeshData` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshData,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given mesh.
    pub fn new(mesh: &'a MeshData) -> Self {
        Self { mesh }
    }

    /// Number of vertices (vertices buffer length / 9).
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len() / STRIDE
    }

    /// Number of triangles (indices buffer length / 3).
    pub fn triangle_count(&self) -> usize {
        self.mesh.indices.len() / 3
    }

    /// Check that the vertex buffer length is a multiple of 9 (the stride).
    pub fn is_stride_valid(&self) -> bool {
        self.mesh.vertices.len() % STRIDE == 0
    }

    /// Check that the index buffer length is a multiple of 3.
    pub fn is_index_stride_valid(&self) -> bool {
        self.mesh.indices.len() % 3 == 0
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh.indices.iter().all(|&i| i < max_idx)
    }

    /// Check that all vertex normals have unit length (within epsilon).
    pub fn are_normals_normalized(&self, epsilon: f32) -> bool {
        (0..self.vertex_count()).all(|i| {
            let base = i * STRIDE;
            let n = Vec3::from_slice(&self.mesh.vertices[base + 3..base + 6]);
            (n.length() - 1.0).abs() <= epsilon
        })
    }

    /// Compute the axis-aligned bounding box of the mesh.
    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_mesh(self.mesh)
    }

    /// Compute the dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        self.aabb()
            .map(|b| (b.max - b.min).to_array())
            .unwrap_or([0.0; 3])
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        dims.iter()
            .zip(expected.iter())
            .all(|(d, e)| (d - e).abs() < tolerance)
    }

    // ── Topology ────────────────────────────────────────────

    /// Undirected edge use counts over the welded triangles
    fn edge_uses(&self) -> HashMap<(usize, usize), usize> {
        let (_, triangles) = self.welded();
        let mut uses = HashMap::new();
        for [a, b, c] in triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *uses.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        uses
    }

    /// Positions merged within `WELD_EPSILON`, and the triangles over them.
    /// Degenerate triangles (two corners welded together) and triangles with
    /// out-of-range indices are dropped.
    pub fn welded(&self) -> (Vec<Vec3>, Vec<[usize; 3]>) {
        let (points, remap) = self.weld();
        let triangles = self
            .mesh
            .indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| (i as usize) < remap.len()))
            .map(|tri| [tri[0], tri[1], tri[2]].map(|i| remap[i as usize]))
            .filter(|[a, b, c]| a != b && b != c && a != c)
            .collect();
        (points, triangles)
    }

    /// Representative positions, and each vertex's representative
    fn weld(&self) -> (Vec<Vec3>, Vec<usize>) {
        let mut grid: HashMap<[i64; 3], Vec<usize>> = HashMap::new();
        let mut reps: Vec<Vec3> = Vec::new();
        let remap = self
            .mesh
            .positions()
            .map(|p| {
                let cell = (p / WELD_EPSILON).floor().as_i64vec3();
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            let key = (cell + I64Vec3::new(dx, dy, dz)).to_array();
                            if let Some(found) = grid
                                .get(&key)
                                .and_then(|ids| ids.iter().find(|&&id| reps[id].distance(p) <= WELD_EPSILON))
                            {
                                return *found;
                            }
                        }
                    }
                }
                let id = reps.len();
                reps.push(p);
                grid.entry(cell.to_array()).or_default().push(id);
                id
            })
            .collect();
        (reps, remap)
    }

    /// Edges used by exactly one triangle
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_uses().values().filter(|&&n| n == 1).count()
    }

    /// Edges shared by more than two triangles
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_uses().values().filter(|&&n| n > 2).count()
    }

    /// Closed 2-manifold: at least one triangle, every edge shared by exactly two
    pub fn is_watertight(&self) -> bool {
        if !self.is_stride_valid() || !self.are_indices_in_range() {
            return false;
        }
        let uses = self.edge_uses();
        !uses.is_empty() && uses.values().all(|&n| n == 2)
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the mesh is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.is_stride_valid() {
            errors.push(format!(
                "Vertex buffer length {} is not a multiple of {STRIDE}",
                self.mesh.vertices.len()
            ));
        }

        if !self.is_index_stride_valid() {
            errors.push(format!(
                "Index buffer length {} is not a multiple of 3",
                self.mesh.indices.len()
            ));
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        if self.vertex_count() > 0 && self.is_stride_valid() && !self.are_normals_normalized(0.1) {
            errors.push("Some normals are not unit-length (epsilon=0.1)".to_string());
        }

        errors
    }
}
