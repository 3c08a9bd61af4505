use std::{collections::HashMap, path::Path};

use dts_core::{Assets, BlendMode, Handle, IflAttributes, RenderMaterial};
use dts_shape::{Material, MaterialFlags, ShapeAsset};
use glam::Vec3;
use log::{debug, warn};

use crate::{
    error::{FormatError, ImportError},
    texture::{FileSystem, TextureStore, find_texture},
};

/// Named colors the engine ships without a texture, as 0-255 RGB.
const DEFAULT_COLORS: [(&str, [u8; 3]); 17] = [
    ("black", [0, 0, 0]),
    ("black25", [191, 191, 191]),
    ("black50", [128, 128, 128]),
    ("black75", [64, 64, 64]),
    ("blank", [255, 255, 255]),
    ("blue", [0, 0, 255]),
    ("darkRed", [128, 0, 0]),
    ("gray25", [64, 64, 64]),
    ("gray50", [128, 128, 128]),
    ("gray75", [191, 191, 191]),
    ("green", [26, 128, 64]),
    ("lightBlue", [10, 186, 245]),
    ("lightYellow", [249, 249, 99]),
    ("palegreen", [125, 136, 104]),
    ("red", [213, 0, 0]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
];

/// The normalised default color for a material name, if it has one.
pub fn default_color(name: &str) -> Option<Vec3> {
    DEFAULT_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, [r, g, b])| Vec3::new(*r as f32, *g as f32, *b as f32) / 255.0)
}

fn random_color() -> Vec3 {
    Vec3::new(rand::random(), rand::random(), rand::random())
}

pub fn blend_mode(flags: MaterialFlags) -> Option<BlendMode> {
    let additive = flags.contains(MaterialFlags::ADDITIVE);
    let subtractive = flags.contains(MaterialFlags::SUBTRACTIVE);

    match (additive, subtractive) {
        (true, true) => Some(BlendMode::Both),
        (true, false) => Some(BlendMode::Additive),
        (false, true) => Some(BlendMode::Subtractive),
        (false, false) if flags.contains(MaterialFlags::TRANSLUCENT) => Some(BlendMode::Disabled),
        (false, false) => None,
    }
}

fn apply_flags(material: &mut RenderMaterial, flags: MaterialFlags) {
    material.shadeless = flags.contains(MaterialFlags::SELF_ILLUMINATING);
    material.transparent = flags.contains(MaterialFlags::TRANSLUCENT);
    material.blend_mode = blend_mode(flags);
    material.no_s_wrap = !flags.contains(MaterialFlags::S_WRAP);
    material.no_t_wrap = !flags.contains(MaterialFlags::T_WRAP);
    material.env_map = !flags.contains(MaterialFlags::NEVER_ENV_MAP);
    material.mip_map = !flags.contains(MaterialFlags::NO_MIP_MAP);
    material.ifl = flags.contains(MaterialFlags::IFL_MATERIAL);
}

/// Shape material index -> renderable material.
#[derive(Debug, Default)]
pub struct ResolvedMaterials {
    assets: Assets<RenderMaterial>,
    by_index: HashMap<usize, Handle<RenderMaterial>>,
}

impl ResolvedMaterials {
    pub fn handle(&self, index: usize) -> Option<Handle<RenderMaterial>> {
        self.by_index.get(&index).copied()
    }

    pub fn get(&self, handle: Handle<RenderMaterial>) -> Option<&RenderMaterial> {
        self.assets.get(handle)
    }

    pub fn by_index(&self, index: usize) -> Option<&RenderMaterial> {
        self.handle(index).and_then(|h| self.assets.get(h))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Resolves each distinct material descriptor once.
///
/// Descriptors are identified by their index in the shape's material list;
/// asking again for an index already seen returns the earlier handle without
/// touching the filesystem.
pub struct MaterialResolver<'a, F: FileSystem + ?Sized, T: TextureStore + ?Sized> {
    fs: &'a F,
    textures: &'a mut T,
    shape_path: &'a Path,
    table: ResolvedMaterials,
}

impl<'a, F: FileSystem + ?Sized, T: TextureStore + ?Sized> MaterialResolver<'a, F, T> {
    pub fn new(fs: &'a F, textures: &'a mut T, shape_path: &'a Path) -> Self {
        Self {
            fs,
            textures,
            shape_path,
            table: ResolvedMaterials::default(),
        }
    }

    pub fn resolve(&mut self, index: usize, descriptor: &Material) -> Handle<RenderMaterial> {
        if let Some(handle) = self.table.handle(index) {
            return handle;
        }

        let material = self.build(descriptor);
        let handle = self.table.assets.add(material);
        self.table.by_index.insert(index, handle);
        handle
    }

    /// Resolve every material of `shape` in list order.
    pub fn resolve_all(&mut self, shape: &ShapeAsset) {
        for (index, descriptor) in shape.materials.iter().enumerate() {
            self.resolve(index, descriptor);
        }
    }

    pub fn finish(self) -> ResolvedMaterials {
        self.table
    }

    fn build(&mut self, descriptor: &Material) -> RenderMaterial {
        let mut material = RenderMaterial::new(&descriptor.name);

        // Texture on disk, else a named default color, else a random one
        match find_texture(self.fs, self.shape_path, &descriptor.name) {
            Some(path) => match self.textures.load(&path) {
                Ok(texture) => {
                    debug!("material '{}' uses {}", descriptor.name, path.display());
                    material.diffuse_texture = Some(texture);
                }
                Err(err) => warn!("material '{}': {err}", descriptor.name),
            },
            None => {
                material.diffuse_color =
                    Some(default_color(&descriptor.name).unwrap_or_else(random_color));
            }
        }

        // Shading, blending and sampling all come from the flag word
        apply_flags(&mut material, descriptor.flags());
        material
    }
}

/// Copy IFL animation attributes onto the materials they belong to.
pub fn apply_ifl_materials(
    table: &mut ResolvedMaterials,
    shape: &ShapeAsset,
) -> Result<(), ImportError> {
    for ifl in &shape.ifl_materials {
        let material = table
            .handle(ifl.slot)
            .and_then(|h| table.assets.get_mut(h))
            .ok_or_else(|| ImportError::Integrity {
                material: format!("#{}", ifl.slot),
                slot: ifl.slot,
            })?;

        if !material.ifl {
            return Err(ImportError::Integrity {
                material: material.name.clone(),
                slot: ifl.slot,
            });
        }

        let name = shape
            .name(ifl.name)
            .ok_or(FormatError::NameIndex { index: ifl.name })?;
        material.ifl_attributes = Some(IflAttributes {
            name: name.to_string(),
            first_frame: ifl.first_frame,
            num_frames: ifl.num_frames,
            time: ifl.time,
        });
    }
    Ok(())
}
