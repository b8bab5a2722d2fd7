//! Errors

use thiserror::Error;

/// Errors raised while validating drawing input
///
/// All validation happens before the pixel buffer is touched.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("dashes must be an even length sequence; found {0}")]
    OddDashes(usize),
    #[error("{what} must have matching lengths; expected {expected} found {found}")]
    LengthMismatch { what: &'static str, expected: usize, found: usize },
    #[error("GC _capstyle attribute must be one of butt, round, projecting; found {0}")]
    InvalidCapStyle(String),
    #[error("GC _joinstyle attribute must be one of miter, round, bevel; found {0}")]
    InvalidJoinStyle(String),
    #[error("snap mode must be one of auto, true, false; found {0}")]
    InvalidSnap(String),
    #[error("origin must be upper or lower; found {0}")]
    InvalidOrigin(String),
    #[error("invalid path code {0}")]
    InvalidPathCode(u8),
    #[error("transform is not invertible")]
    SingularTransform,
    #[error("bounding box must have 4 values; found {0}")]
    InvalidBbox(usize),
    #[error("Offsets array must be Nx2; found {0} values")]
    InvalidOffsets(usize),
    #[error("width and height must each be between 1 and 32767; found {width}x{height}")]
    InvalidSize { width: usize, height: usize },
    #[error("restore rectangle exceeds the saved region")]
    RegionOutOfBounds,
    #[error("cannot restore an empty region")]
    EmptyRegion,
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, RenderError>;
