use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::flags::{DrawMode, MaterialFlags, PrimitiveFlags};

/// Index value meaning "no node" in parent and object-node fields.
pub const NO_NODE: i32 = -1;

fn as_index(raw: i32) -> Option<usize> {
    usize::try_from(raw).ok()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Node {
    pub name: usize,
    pub parent: i32,
}

impl Node {
    pub fn parent(&self) -> Option<usize> {
        as_index(self.parent)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub flags: u32,
}

impl Material {
    pub fn flags(&self) -> MaterialFlags {
        MaterialFlags::from_bits_retain(self.flags)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IflMaterial {
    pub name: usize,
    pub slot: usize,
    pub first_frame: u32,
    pub num_frames: u32,
    pub time: f32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeshType {
    Standard,
    Skin,
    Decal,
    Sorted,
    Null,
}

impl MeshType {
    pub fn name(&self) -> &'static str {
        match self {
            MeshType::Standard => "Standard",
            MeshType::Skin => "Skin",
            MeshType::Decal => "Decal",
            MeshType::Sorted => "Sorted",
            MeshType::Null => "Null",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Primitive {
    #[serde(rename = "type")]
    pub ty: u32,
    pub first_element: usize,
    pub num_elements: usize,
}

impl Primitive {
    pub fn flags(&self) -> PrimitiveFlags {
        PrimitiveFlags::from_bits_retain(self.ty)
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.flags().draw_mode()
    }

    /// Material slot in the shape's material list, unless `NO_MATERIAL` is set.
    pub fn material(&self) -> Option<usize> {
        if self.flags().contains(PrimitiveFlags::NO_MATERIAL) {
            None
        } else {
            Some((self.ty & PrimitiveFlags::MATERIAL_MASK.bits()) as usize)
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Mesh {
    #[serde(rename = "type")]
    pub ty: MeshType,
    #[serde(default)]
    pub verts: Vec<Vec3>,
    #[serde(default)]
    pub normals: Vec<Vec3>,
    #[serde(default)]
    pub tverts: Vec<Vec2>,
    #[serde(default)]
    pub indices: Vec<u32>,
    #[serde(default)]
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    pub fn null() -> Self {
        Self {
            ty: MeshType::Null,
            verts: Vec::new(),
            normals: Vec::new(),
            tverts: Vec::new(),
            indices: Vec::new(),
            primitives: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Object {
    pub name: usize,
    pub node: i32,
    pub first_mesh: usize,
    pub num_meshes: usize,
}

impl Object {
    pub fn node(&self) -> Option<usize> {
        as_index(self.node)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DetailLevel {
    pub name: usize,
    pub object_detail: i32,
    #[serde(default)]
    pub size: f32,
}

// Keyframe data is carried for round-tripping only; nothing interprets it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Sequence {
    pub name: usize,
    pub num_keyframes: u32,
    pub duration: f32,
    pub base_rotation: usize,
    pub base_translation: usize,
    #[serde(default)]
    pub rotation_matters: Vec<bool>,
    #[serde(default)]
    pub translation_matters: Vec<bool>,
}

/// A fully decoded shape.
///
/// `default_translations` and `default_rotations` run parallel to `nodes`.
/// Rotations are in the shape's own `(x, y, z, w)` convention.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ShapeAsset {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub default_translations: Vec<Vec3>,
    #[serde(default)]
    pub default_rotations: Vec<Quat>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub ifl_materials: Vec<IflMaterial>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub detail_levels: Vec<DetailLevel>,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub node_translations: Vec<Vec3>,
    #[serde(default)]
    pub node_rotations: Vec<Quat>,
}

impl ShapeAsset {
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Index of `name` in the name table, appending it if it is new.
    pub fn intern(&mut self, name: &str) -> usize {
        match self.names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        }
    }
}
