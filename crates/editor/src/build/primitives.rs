//! Primitive tessellation

use shared::Primitive;

use crate::viewport::mesh::{cube, frustum, pyramid, sphere, MeshData, DEFAULT_COLOR};

/// Tessellate a primitive centered on the origin, axis along +Y
pub fn tessellate(primitive: &Primitive) -> MeshData {
    match primitive {
        Primitive::Cube { size } => {
            let s = *size as f32;
            cube(s, s, s, DEFAULT_COLOR)
        }
        Primitive::Sphere { radius, resolution } => {
            let res = (*resolution).max(3);
            sphere(*radius as f32, res, res, DEFAULT_COLOR)
        }
        Primitive::Cone {
            radius,
            height,
            resolution,
        } => frustum(*radius as f32, 0.0, *height as f32, (*resolution).max(3), DEFAULT_COLOR),
        Primitive::Cylinder {
            radius,
            height,
            resolution,
        } => frustum(
            *radius as f32,
            *radius as f32,
            *height as f32,
            (*resolution).max(3),
            DEFAULT_COLOR,
        ),
        Primitive::Pyramid {
            sides,
            side_length,
            height,
        } => pyramid((*sides).max(3), *side_length as f32, *height as f32, DEFAULT_COLOR),
    }
}
