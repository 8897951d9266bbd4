mod dml;

pub use dml::DmlSource;

use thiserror::Error;

use crate::format::dml::{DmlError, FrameLayout};
use crate::grid::Image;

/// Random access to the cropped images of a frame sequence.
pub trait FrameSource {
    fn layout(&self) -> &FrameLayout;
    fn frame_count(&self) -> usize;
    fn read_image(&self, index: usize) -> Result<Image, SourceError>;
    /// Size of the underlying input in bytes.
    fn input_bytes(&self) -> u64;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DML format error: {0}")]
    Format(#[from] DmlError),
}
