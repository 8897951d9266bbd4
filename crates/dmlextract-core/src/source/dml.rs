use std::fs;
use std::path::Path;

use tracing::debug;

use crate::format::dml::{FrameLayout, frame_count, read_frame};
use crate::grid::Image;

use super::{FrameSource, SourceError};

/// A `.dml` file held fully in memory.
///
/// The frame count is validated on construction, so a misaligned input is
/// rejected before any frame is decoded.
pub struct DmlSource {
    buffer: Vec<u8>,
    layout: FrameLayout,
    frames: usize,
}

impl DmlSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let buffer = fs::read(path)?;
        debug!(path = %path.display(), bytes = buffer.len(), "read dml input");
        Self::from_bytes(buffer, FrameLayout::DML)
    }

    pub fn from_bytes(buffer: Vec<u8>, layout: FrameLayout) -> Result<Self, SourceError> {
        let frames = frame_count(buffer.len(), layout.frame_bytes())?;
        Ok(Self {
            buffer,
            layout,
            frames,
        })
    }
}

impl FrameSource for DmlSource {
    fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    fn frame_count(&self) -> usize {
        self.frames
    }

    fn read_image(&self, index: usize) -> Result<Image, SourceError> {
        read_frame(&self.buffer, index, &self.layout).map_err(SourceError::from)
    }

    fn input_bytes(&self) -> u64 {
        self.buffer.len() as u64
    }
}
