use crate::grid::{DisplayImage, DisplayImage16, ReconstructedImage};

/// Largest absolute pixel value, or 0 for an empty image.
pub fn max_abs(image: &ReconstructedImage) -> u32 {
    image
        .as_slice()
        .iter()
        .map(|v| v.unsigned_abs())
        .max()
        .unwrap_or(0)
}

/// An image with no signal to scale by.
pub fn is_degenerate(image: &ReconstructedImage) -> bool {
    max_abs(image) == 0
}

/// Rescale to 8 bits by the image's own maximum absolute value.
///
/// Each pixel becomes `round(clamp(v / max_abs, 0, 1) * 255)`; negative values
/// land on 0. A degenerate image yields all zeros.
///
/// # Examples
/// ```
/// use dmlextract_core::Grid;
/// use dmlextract_core::transform::normalize;
///
/// let image = Grid::from_vec(1, 3, vec![0, 50, 100])?;
/// assert_eq!(normalize(&image).as_slice(), &[0, 128, 255]);
/// # Ok::<(), dmlextract_core::GridError>(())
/// ```
pub fn normalize(image: &ReconstructedImage) -> DisplayImage {
    let scale = unit_scale(image);
    image.map(|v| quantize(v, scale, f64::from(u8::MAX)) as u8)
}

/// Same as [`normalize`] with a 16-bit output range.
pub fn normalize_u16(image: &ReconstructedImage) -> DisplayImage16 {
    let scale = unit_scale(image);
    image.map(|v| quantize(v, scale, f64::from(u16::MAX)) as u16)
}

fn unit_scale(image: &ReconstructedImage) -> Option<f64> {
    match max_abs(image) {
        0 => None,
        m => Some(f64::from(m)),
    }
}

fn quantize(value: i32, scale: Option<f64>, full: f64) -> f64 {
    let unit = match scale {
        Some(m) => (f64::from(value) / m).clamp(0.0, 1.0),
        None => 0.0,
    };
    (unit * full).round()
}
