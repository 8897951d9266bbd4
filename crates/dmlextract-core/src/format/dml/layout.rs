use std::ops::Range;

pub const FRAME_ROWS: usize = 64;
pub const FRAME_COLS: usize = 96;
pub const PIXEL_BYTES: usize = 2;
pub const FRAME_PIXELS: usize = FRAME_ROWS * FRAME_COLS;
pub const FRAME_BYTES: usize = FRAME_PIXELS * PIXEL_BYTES;

pub const IMAGE_ROWS: Range<usize> = 2..62;
pub const IMAGE_COLS: Range<usize> = 5..94;
pub const IMAGE_SHAPE: (usize, usize) = (60, 89);

/// Half-open row/column window kept from each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropWindow {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl CropWindow {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }
}

/// Immutable frame geometry handed to the reader and the source.
///
/// Samples are always little-endian `i16`; only the frame shape and the
/// crop window vary.
///
/// # Examples
/// ```
/// use dmlextract_core::FrameLayout;
///
/// let layout = FrameLayout::DML;
/// assert_eq!(layout.frame_bytes(), 12288);
/// assert_eq!(layout.image_shape(), (60, 89));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    pub frame_rows: usize,
    pub frame_cols: usize,
    pub crop: CropWindow,
}

impl FrameLayout {
    pub const DML: FrameLayout = FrameLayout {
        frame_rows: FRAME_ROWS,
        frame_cols: FRAME_COLS,
        crop: CropWindow {
            rows: IMAGE_ROWS,
            cols: IMAGE_COLS,
        },
    };

    pub fn frame_shape(&self) -> (usize, usize) {
        (self.frame_rows, self.frame_cols)
    }

    pub fn image_shape(&self) -> (usize, usize) {
        self.crop.shape()
    }

    pub fn frame_pixels(&self) -> usize {
        self.frame_rows * self.frame_cols
    }

    pub fn frame_bytes(&self) -> usize {
        self.frame_pixels() * PIXEL_BYTES
    }
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::DML
    }
}
