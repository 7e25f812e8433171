use std::path::PathBuf;
use tileworld_common::LayerKind;
use tileworld_kernel::{ShapeError, ValidationError};

/// Errors from loading a world. All of them are recoverable: the store keeps
/// whatever world it had before.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("world {0:?} not found")]
    NotFound(String),
    #[error("invalid world name {0:?}")]
    InvalidName(String),
    #[error("failed to parse world: {0}")]
    Json(#[from] serde_json::Error),
    #[error("world document has no {0} layer")]
    MissingLayer(LayerKind),
    #[error("malformed world: {0}")]
    Shape(#[from] ShapeError),
    #[error("invalid tile in {layer} layer at ({x}, {y}): {source}")]
    InvalidTile {
        layer: LayerKind,
        x: usize,
        y: usize,
        #[source]
        source: ValidationError,
    },
}
