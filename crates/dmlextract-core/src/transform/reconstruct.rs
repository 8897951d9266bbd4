use crate::grid::{GridError, Image, ReconstructedImage};

/// Add a difference image to the reference, widening to `i32`.
///
/// Both inputs come from the same decode path, so a shape mismatch means a
/// caller bug; it is reported rather than panicking.
///
/// # Examples
/// ```
/// use dmlextract_core::Grid;
/// use dmlextract_core::transform::reconstruct;
///
/// let frame = Grid::filled(2, 2, i16::MAX);
/// let reference = Grid::filled(2, 2, 1i16);
/// let image = reconstruct(&frame, &reference)?;
/// assert_eq!(image.get(0, 0), Some(i16::MAX as i32 + 1));
/// # Ok::<(), dmlextract_core::GridError>(())
/// ```
pub fn reconstruct(frame: &Image, reference: &Image) -> Result<ReconstructedImage, GridError> {
    frame.zip_with(reference, |delta, base| i32::from(delta) + i32::from(base))
}

/// The reference image in the reconstructed domain, unchanged in value.
pub fn widen(image: &Image) -> ReconstructedImage {
    image.map(i32::from)
}
