use thiserror::Error;

/// Errors returned by `.dml` decoding.
///
/// # Examples
/// ```
/// use dmlextract_core::format::dml::DmlError;
///
/// let err = DmlError::SizeMismatch { len: 12000, frame_bytes: 12288 };
/// assert!(err.to_string().contains("not a multiple"));
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DmlError {
    #[error("input length {len} is not a multiple of the frame size {frame_bytes}")]
    SizeMismatch { len: usize, frame_bytes: usize },
    #[error("frame {index} out of bounds: need {needed} bytes, got {actual}")]
    MalformedInput {
        index: usize,
        needed: usize,
        actual: usize,
    },
    #[error("invalid frame layout: {reason}")]
    InvalidLayout { reason: &'static str },
}
