use glam::{Vec2, Vec3};

use crate::{assets::Handle, material::RenderMaterial};

/// One face of a [`TriangleMesh`]. `material` indexes the mesh's own slot list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [u32; 3],
    pub material: Option<usize>,
}

/// Renderable triangle geometry.
///
/// `positions` and `normals` are indexed by vertex; `uvs` are indexed by
/// loop, three per triangle, in triangle order.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<Triangle>,
    pub uvs: Vec<Vec2>,
    pub materials: Vec<Handle<RenderMaterial>>,
}

impl TriangleMesh {
    pub fn loop_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// UVs of the three corners of triangle `index`.
    pub fn triangle_uvs(&self, index: usize) -> Option<&[Vec2]> {
        self.uvs.get(index * 3..index * 3 + 3)
    }
}
