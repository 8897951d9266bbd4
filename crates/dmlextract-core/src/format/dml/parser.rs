use crate::grid::{Frame, Image};

use super::error::DmlError;
use super::layout::FrameLayout;
use super::reader::DmlReader;

/// Number of whole frames in a buffer of `buffer_len` bytes.
///
/// # Errors
/// `SizeMismatch` when the length is not an exact multiple of
/// `frame_byte_size`; `InvalidLayout` when the frame size is zero.
///
/// # Examples
/// ```
/// use dmlextract_core::format::dml::frame_count;
///
/// assert_eq!(frame_count(3 * 12288, 12288)?, 3);
/// assert!(frame_count(12000, 12288).is_err());
/// # Ok::<(), dmlextract_core::format::dml::DmlError>(())
/// ```
pub fn frame_count(buffer_len: usize, frame_byte_size: usize) -> Result<usize, DmlError> {
    if frame_byte_size == 0 {
        return Err(DmlError::InvalidLayout {
            reason: "frame size is zero",
        });
    }
    if buffer_len % frame_byte_size != 0 {
        return Err(DmlError::SizeMismatch {
            len: buffer_len,
            frame_bytes: frame_byte_size,
        });
    }
    Ok(buffer_len / frame_byte_size)
}

/// Decode frame `index` into a full `frame_rows × frame_cols` grid.
pub fn decode_frame(buffer: &[u8], index: usize, layout: &FrameLayout) -> Result<Frame, DmlError> {
    let reader = DmlReader::new(buffer, layout.frame_bytes());
    let samples = reader.read_samples(index)?;
    Frame::from_vec(layout.frame_rows, layout.frame_cols, samples).map_err(|_| {
        DmlError::InvalidLayout {
            reason: "sample count does not match frame shape",
        }
    })
}

/// Decode frame `index` and crop it to the valid image window.
///
/// # Examples
/// ```
/// use dmlextract_core::FrameLayout;
/// use dmlextract_core::format::dml::read_frame;
///
/// let buffer = vec![0u8; FrameLayout::DML.frame_bytes()];
/// let image = read_frame(&buffer, 0, &FrameLayout::DML)?;
/// assert_eq!(image.shape(), (60, 89));
/// # Ok::<(), dmlextract_core::format::dml::DmlError>(())
/// ```
pub fn read_frame(buffer: &[u8], index: usize, layout: &FrameLayout) -> Result<Image, DmlError> {
    let frame = decode_frame(buffer, index, layout)?;
    frame
        .crop(layout.crop.rows.clone(), layout.crop.cols.clone())
        .map_err(|_| DmlError::InvalidLayout {
            reason: "crop window exceeds frame shape",
        })
}

#[cfg(test)]
mod tests {
    use super::{decode_frame, frame_count, read_frame};
    use crate::format::dml::error::DmlError;
    use crate::format::dml::layout::{self, CropWindow, FrameLayout};

    fn frame_with(f: impl Fn(usize, usize) -> i16) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(layout::FRAME_BYTES);
        for row in 0..layout::FRAME_ROWS {
            for col in 0..layout::FRAME_COLS {
                bytes.extend_from_slice(&f(row, col).to_le_bytes());
            }
        }
        bytes
    }

    #[test]
    fn frame_count_exact_multiple() {
        assert_eq!(frame_count(0, layout::FRAME_BYTES).unwrap(), 0);
        assert_eq!(frame_count(5 * layout::FRAME_BYTES, layout::FRAME_BYTES).unwrap(), 5);
    }

    #[test]
    fn frame_count_rejects_remainder() {
        let err = frame_count(12000, layout::FRAME_BYTES).unwrap_err();
        assert_eq!(
            err,
            DmlError::SizeMismatch {
                len: 12000,
                frame_bytes: 12288
            }
        );
        // A multiple of the pixel count but not of the byte size.
        assert!(frame_count(layout::FRAME_PIXELS, layout::FRAME_BYTES).is_err());
    }

    #[test]
    fn frame_count_rejects_zero_frame_size() {
        let err = frame_count(10, 0).unwrap_err();
        assert!(matches!(err, DmlError::InvalidLayout { .. }));
    }

    #[test]
    fn decode_frame_fills_row_major() {
        let bytes = frame_with(|row, col| (row * 100 + col) as i16);
        let frame = decode_frame(&bytes, 0, &FrameLayout::DML).unwrap();
        assert_eq!(frame.shape(), (64, 96));
        assert_eq!(frame.get(0, 0), Some(0));
        assert_eq!(frame.get(3, 7), Some(307));
        assert_eq!(frame.get(63, 95), Some(6395));
    }

    #[test]
    fn read_frame_crops_to_valid_window() {
        let bytes = frame_with(|row, col| (row * 100 + col) as i16);
        let image = read_frame(&bytes, 0, &FrameLayout::DML).unwrap();
        assert_eq!(image.shape(), layout::IMAGE_SHAPE);
        assert_eq!(image.get(0, 0), Some(205));
        assert_eq!(image.get(59, 88), Some(6193));
    }

    #[test]
    fn read_frame_selects_later_frames() {
        let mut bytes = frame_with(|_, _| 1);
        bytes.extend(frame_with(|_, _| -7));
        let image = read_frame(&bytes, 1, &FrameLayout::DML).unwrap();
        assert!(image.as_slice().iter().all(|&v| v == -7));
    }

    #[test]
    fn read_frame_truncated_is_malformed() {
        let bytes = vec![0u8; layout::FRAME_BYTES - 2];
        let err = read_frame(&bytes, 0, &FrameLayout::DML).unwrap_err();
        assert!(matches!(err, DmlError::MalformedInput { index: 0, .. }));
    }

    #[test]
    fn read_frame_rejects_crop_outside_frame() {
        let layout = FrameLayout {
            frame_rows: 4,
            frame_cols: 4,
            crop: CropWindow {
                rows: 0..5,
                cols: 0..4,
            },
        };
        let bytes = vec![0u8; layout.frame_bytes()];
        let err = read_frame(&bytes, 0, &layout).unwrap_err();
        assert!(matches!(err, DmlError::InvalidLayout { .. }));
    }
}
