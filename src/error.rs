//! Error type shared by every stage of the tile pipeline.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Unsupported shape or texture, or a shape that cannot be drawn at the requested size.
    #[error("shape error: {0}")]
    Shape(String),

    /// A tile name or numeric ID that the sprite sheet index does not know.
    #[error("unknown tile {0}")]
    IndexResolution(String),

    /// A paint zone reaching outside the layout grid.
    #[error("zone {region} is outside the {width}x{height} grid")]
    RegionBounds {
        region: String,
        width: usize,
        height: usize,
    },

    /// The map document lacks the tilesets/layers it is expected to carry.
    #[error("map document: {0}")]
    DocumentShape(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
