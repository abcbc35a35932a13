//! Error types for detpost.

use thiserror::Error;

/// Result alias for detpost operations.
pub type DetPostResult<T> = std::result::Result<T, DetPostError>;

/// Errors raised while wiring tensors, labels and configuration together.
///
/// Per-frame postprocessing itself never fails on data content; these errors
/// surface shape and parameter mistakes at the boundary.
#[derive(Debug, Error, PartialEq)]
pub enum DetPostError {
    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A tensor buffer does not have the length implied by the anchor count.
    #[error("{what} buffer has {got} elements, expected {expected}")]
    BufferLengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A frame carries a different anchor count than the detector was built for.
    #[error("frame has {got} anchors, detector expects {expected}")]
    AnchorCountMismatch { expected: usize, got: usize },
    /// Sensor orientation is not one of 0, 90, 180 or 270 degrees.
    #[error("unsupported sensor orientation: {degrees} degrees")]
    InvalidOrientation { degrees: i32 },
    /// The label table has no entries.
    #[error("label table is empty")]
    EmptyLabelTable,
    /// A configuration value is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// Reading a labels file failed.
    #[error("io error: {reason}")]
    Io { reason: String },
    /// Decoding an image failed.
    #[cfg(feature = "image-io")]
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
