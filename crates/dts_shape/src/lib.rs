pub mod codec;
pub mod flags;
pub mod report;
pub mod shape;

pub use codec::{JsonShapeCodec, ShapeError, ShapeReader, ShapeWriter};
pub use flags::{DrawMode, MaterialFlags, PrimitiveFlags};
pub use shape::{
    DetailLevel, IflMaterial, Material, Mesh, MeshType, NO_NODE, Node, Object, Primitive,
    Sequence, ShapeAsset,
};
