bitflags::bitflags! {
    /// Per-material render flags, bit-for-bit as stored in the shape.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        const S_WRAP              = 1 << 0;
        const T_WRAP              = 1 << 1;
        const TRANSLUCENT         = 1 << 2;
        const ADDITIVE            = 1 << 3;
        const SUBTRACTIVE         = 1 << 4;
        const SELF_ILLUMINATING   = 1 << 5;
        const NEVER_ENV_MAP       = 1 << 6;
        const NO_MIP_MAP          = 1 << 7;
        const MIP_MAP_ZERO_BORDER = 1 << 8;
        const IFL_MATERIAL        = 1 << 27;
        const IFL_FRAME           = 1 << 28;
        const DETAIL_MAP          = 1 << 29;
        const BUMP_MAP            = 1 << 30;
        const REFLECTANCE_MAP     = 1 << 31;
    }
}

bitflags::bitflags! {
    /// High bits of a primitive's type word. The low 28 bits hold a material
    /// index, see [`PrimitiveFlags::MATERIAL_MASK`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PrimitiveFlags: u32 {
        const STRIP         = 0x4000_0000;
        const FAN           = 0x8000_0000;
        const TYPE_MASK     = 0xC000_0000;
        const INDEXED       = 0x2000_0000;
        const NO_MATERIAL   = 0x1000_0000;
        const MATERIAL_MASK = 0x0FFF_FFFF;
    }
}

/// How a primitive walks its element range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    Strip,
    Fan,
}

impl PrimitiveFlags {
    /// Strip wins when both mode bits are set; neither means a triangle list.
    pub fn draw_mode(&self) -> DrawMode {
        if self.contains(PrimitiveFlags::STRIP) {
            DrawMode::Strip
        } else if self.contains(PrimitiveFlags::FAN) {
            DrawMode::Fan
        } else {
            DrawMode::Triangles
        }
    }
}
