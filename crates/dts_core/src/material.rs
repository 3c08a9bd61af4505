use std::path::PathBuf;

use glam::Vec3;

#[derive(Clone, Debug)]
pub struct TextureData {
    pub name: String,
    pub path: PathBuf,
    pub pixels: Vec<u8>, // RGBA8, row-major
    pub width: u32,
    pub height: u32,
}

/// How the renderer should blend a material into the frame buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Both,
    Additive,
    Subtractive,
    /// Translucent without an additive or subtractive component.
    Disabled,
}

impl BlendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Both => "both",
            BlendMode::Additive => "additive",
            BlendMode::Subtractive => "subtractive",
            BlendMode::Disabled => "none",
        }
    }
}

/// Image-frame-list animation attributes, copied from the shape's IFL table.
#[derive(Clone, Debug, PartialEq)]
pub struct IflAttributes {
    pub name: String,
    pub first_frame: u32,
    pub num_frames: u32,
    pub time: f32,
}

#[derive(Clone, Debug)]
pub struct RenderMaterial {
    pub name: String,
    pub diffuse_color: Option<Vec3>,
    pub diffuse_texture: Option<TextureData>,
    pub shadeless: bool,
    pub transparent: bool,
    pub blend_mode: Option<BlendMode>,
    pub no_s_wrap: bool,
    pub no_t_wrap: bool,
    pub env_map: bool,
    pub mip_map: bool,
    pub ifl: bool,
    pub ifl_attributes: Option<IflAttributes>,
}

impl RenderMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse_color: None,
            diffuse_texture: None,
            shadeless: false,
            transparent: false,
            blend_mode: None,
            no_s_wrap: false,
            no_t_wrap: false,
            env_map: false,
            mip_map: false,
            ifl: false,
            ifl_attributes: None,
        }
    }
}
