//! Error types for the viewport core.

use thiserror::Error;
use uavview_canvas::CanvasError;

/// Recoverable conditions raised by viewport operations.
///
/// None of these are fatal: a rejected frame leaves the previous one on
/// screen, a missing icon only hides the marker.
#[derive(Debug, Error)]
pub enum ViewportError {
    /// Frame dimensions, stride or buffer length are inconsistent
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// An asset could not be found by any resolver
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// An asset was found but could not be decoded
    #[error("Failed to decode asset {name}: {reason}")]
    AssetDecode { name: String, reason: String },

    /// A requested scale fell outside the configured bounds
    #[error("Scale {requested} is outside the allowed range [{min}, {max}]")]
    TransformOutOfBounds { requested: f32, min: f32, max: f32 },

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewportError>;
