use std::collections::HashMap;

use dts_core::{Triangle, TriangleMesh};
use dts_shape::{Mesh, MeshType, ShapeAsset};
use glam::Vec2;
use log::{debug, warn};

use crate::{
    error::{FormatError, ImportError},
    material::ResolvedMaterials,
    primitive,
};

/// The engine stores texel rows top-down; the scene expects them bottom-up.
pub fn flip_uv(texel: Vec2) -> Vec2 {
    Vec2::new(texel.x, 1.0 - texel.y)
}

pub struct MeshAssembler<'a> {
    shape: &'a ShapeAsset,
    materials: &'a ResolvedMaterials,
}

impl<'a> MeshAssembler<'a> {
    pub fn new(shape: &'a ShapeAsset, materials: &'a ResolvedMaterials) -> Self {
        Self { shape, materials }
    }

    /// Assemble mesh `index` of the shape, naming the result `name`.
    ///
    /// Null meshes and mesh types without import support yield `Ok(None)`.
    pub fn assemble(&self, index: usize, name: &str) -> Result<Option<TriangleMesh>, ImportError> {
        let mesh = self.shape.meshes.get(index).ok_or_else(|| FormatError::InvalidMesh {
            mesh: index,
            reason: "mesh index past the end of the mesh list".into(),
        })?;

        match mesh.ty {
            MeshType::Standard => {}
            MeshType::Null => return Ok(None),
            other => {
                warn!(
                    "{name} is a {} mesh, skipping due to lack of support",
                    other.name()
                );
                return Ok(None);
            }
        }

        check_source(index, mesh)?;

        let mut out = TriangleMesh {
            name: name.to_string(),
            positions: mesh.verts.clone(),
            normals: mesh.normals.clone(),
            ..Default::default()
        };
        let mut slots: HashMap<usize, usize> = HashMap::new();

        for (p, prim) in mesh.primitives.iter().enumerate() {
            let triangles =
                primitive::decode(prim.ty, prim.first_element, prim.num_elements, &mesh.indices)
                    .map_err(|source| FormatError::Primitive {
                        mesh: index,
                        primitive: p,
                        source,
                    })?;

            let slot = match prim.material() {
                None => None,
                Some(material) => Some(match slots.get(&material) {
                    Some(&slot) => slot,
                    None => {
                        let handle = self.materials.handle(material).ok_or(
                            FormatError::MaterialIndex {
                                mesh: index,
                                primitive: p,
                                index: material,
                            },
                        )?;
                        out.materials.push(handle);
                        slots.insert(material, out.materials.len() - 1);
                        out.materials.len() - 1
                    }
                }),
            };

            out.triangles.extend(triangles.map(|vertices| Triangle {
                vertices,
                material: slot,
            }));
        }

        check_triangles(index, &out)?;

        // One UV per loop; indices were range-checked above and tverts
        // is as long as verts.
        out.uvs = out
            .triangles
            .iter()
            .flat_map(|tri| tri.vertices)
            .map(|v| flip_uv(mesh.tverts[v as usize]))
            .collect();

        debug!(
            "mesh {index} '{name}': {} triangles, {} materials",
            out.triangles.len(),
            out.materials.len()
        );
        Ok(Some(out))
    }
}

fn check_source(index: usize, mesh: &Mesh) -> Result<(), FormatError> {
    let verts = mesh.verts.len();
    if mesh.normals.len() != verts || mesh.tverts.len() != verts {
        return Err(FormatError::InvalidMesh {
            mesh: index,
            reason: format!(
                "{verts} vertices but {} normals and {} texture coordinates",
                mesh.normals.len(),
                mesh.tverts.len()
            ),
        });
    }
    Ok(())
}

fn check_triangles(index: usize, mesh: &TriangleMesh) -> Result<(), FormatError> {
    let invalid = |reason: String| FormatError::InvalidMesh {
        mesh: index,
        reason,
    };

    let vertex_count = mesh.positions.len();
    for (t, tri) in mesh.triangles.iter().enumerate() {
        if let Some(&v) = tri.vertices.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(invalid(format!(
                "triangle {t} references vertex {v} of {vertex_count}"
            )));
        }
        if let Some(slot) = tri.material {
            if slot >= mesh.materials.len() {
                return Err(invalid(format!("triangle {t} uses missing material slot {slot}")));
            }
        }
    }
    Ok(())
}
