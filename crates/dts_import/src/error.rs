use dts_shape::ShapeError;

/// Why a single primitive could not be expanded into triangles.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PrimitiveError {
    #[error("primitive type {ty:#010x} is not indexed")]
    NotIndexed { ty: u32 },
    #[error("elements {first}..{end} exceed an index buffer of {len}")]
    OutOfBounds { first: usize, end: usize, len: usize },
}

/// The shape data itself is malformed.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("unreadable shape: {0}")]
    Unreadable(#[from] ShapeError),
    #[error("mesh {mesh}, primitive {primitive}: {source}")]
    Primitive {
        mesh: usize,
        primitive: usize,
        #[source]
        source: PrimitiveError,
    },
    #[error("mesh {mesh}, primitive {primitive}: material index {index} does not exist")]
    MaterialIndex {
        mesh: usize,
        primitive: usize,
        index: usize,
    },
    #[error("mesh {mesh} is invalid: {reason}")]
    InvalidMesh { mesh: usize, reason: String },
    #[error("name index {index} is out of range")]
    NameIndex { index: usize },
    #[error("node {node} has no default translation or rotation")]
    MissingDefaultTransform { node: usize },
    #[error("object {object} is attached to node {node}, which does not exist")]
    NodeIndex { object: usize, node: usize },
    #[error("object {object} claims meshes {first}..{first}+{count}, past the end of the mesh list")]
    MeshRange {
        object: usize,
        first: usize,
        count: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("node {node} references parent {parent}, which is not built before it")]
    Structural { node: usize, parent: usize },
    #[error("IFL entry for material '{material}' (slot {slot}) references a material without the IFL flag")]
    Integrity { material: String, slot: usize },
}

impl From<ShapeError> for ImportError {
    fn from(err: ShapeError) -> Self {
        ImportError::Format(FormatError::Unreadable(err))
    }
}
