pub mod assets;
pub mod host;
pub mod material;
pub mod mesh;
pub mod transform;

pub use assets::{Assets, Handle};
pub use host::{GroupId, ObjectId, SceneHost};
pub use material::{BlendMode, IflAttributes, RenderMaterial, TextureData};
pub use mesh::{Triangle, TriangleMesh};
pub use transform::Transform;
