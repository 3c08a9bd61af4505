use std::io::{Read, Write};

use crate::shape::ShapeAsset;

#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("I/O error while accessing shape data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed shape document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a byte stream into a [`ShapeAsset`].
pub trait ShapeReader {
    fn read_shape(&self, reader: &mut dyn Read) -> Result<ShapeAsset, ShapeError>;
}

/// Encodes a [`ShapeAsset`] so that the matching reader yields it back unchanged.
pub trait ShapeWriter {
    fn write_shape(&self, shape: &ShapeAsset, writer: &mut dyn Write) -> Result<(), ShapeError>;
}

/// Interchange codec storing the typed shape model as JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonShapeCodec {
    pub pretty: bool,
}

impl ShapeReader for JsonShapeCodec {
    fn read_shape(&self, reader: &mut dyn Read) -> Result<ShapeAsset, ShapeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ShapeWriter for JsonShapeCodec {
    fn write_shape(&self, shape: &ShapeAsset, writer: &mut dyn Write) -> Result<(), ShapeError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, shape)?;
        } else {
            serde_json::to_writer(&mut *writer, shape)?;
        }
        writer.flush()?;
        Ok(())
    }
}
