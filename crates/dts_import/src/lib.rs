pub mod config;
pub mod error;
pub mod material;
pub mod mesh;
pub mod nodes;
pub mod primitive;
pub mod scene;
pub mod texture;

pub use config::{ImportConfig, NodeMode, VisibilityPolicy};
pub use error::{FormatError, ImportError, PrimitiveError};
pub use material::{MaterialResolver, ResolvedMaterials};
pub use mesh::MeshAssembler;
pub use nodes::NodeTree;
pub use scene::{ImportedObject, ImportedScene, NODE_ORDER_TEXT, ShapeImporter};
pub use texture::{FileSystem, ImageTextureStore, OsFileSystem, TextureStore};
