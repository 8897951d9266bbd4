use std::path::Path;

use image::{GrayImage, ImageBuffer, ImageFormat, Luma};

use crate::grid::{DisplayImage, DisplayImage16, Grid};

use super::OutputError;

pub fn write_gray8(path: &Path, image: &DisplayImage) -> Result<(), OutputError> {
    let (width, height) = dimensions(path, image)?;
    let buffer = GrayImage::from_raw(width, height, image.as_slice().to_vec())
        .ok_or_else(|| buffer_error(path, image))?;
    save_png(path, buffer.save_with_format(path, ImageFormat::Png))
}

pub fn write_gray16(path: &Path, image: &DisplayImage16) -> Result<(), OutputError> {
    let (width, height) = dimensions(path, image)?;
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_raw(width, height, image.as_slice().to_vec())
            .ok_or_else(|| buffer_error(path, image))?;
    save_png(path, buffer.save_with_format(path, ImageFormat::Png))
}

fn dimensions<T: Copy>(path: &Path, image: &Grid<T>) -> Result<(u32, u32), OutputError> {
    let width = u32::try_from(image.cols()).map_err(|_| buffer_error(path, image))?;
    let height = u32::try_from(image.rows()).map_err(|_| buffer_error(path, image))?;
    Ok((width, height))
}

fn buffer_error<T: Copy>(path: &Path, image: &Grid<T>) -> OutputError {
    OutputError::Buffer {
        path: path.to_path_buf(),
        shape: image.shape(),
    }
}

fn save_png(path: &Path, result: image::ImageResult<()>) -> Result<(), OutputError> {
    result.map_err(|source| OutputError::Png {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{write_gray16, write_gray8};
    use crate::grid::Grid;

    #[test]
    fn gray8_round_trips_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("00001.png");
        let image = Grid::from_vec(2, 3, vec![0u8, 10, 20, 30, 40, 255]).unwrap();
        write_gray8(&path, &image).unwrap();

        let decoded = image::open(&path).unwrap().into_luma8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.into_raw(), image.as_slice());
    }

    #[test]
    fn gray16_keeps_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        let image = Grid::from_vec(1, 2, vec![0u16, u16::MAX]).unwrap();
        write_gray16(&path, &image).unwrap();

        let decoded = image::open(&path).unwrap().into_luma16();
        assert_eq!(decoded.into_raw(), vec![0, u16::MAX]);
    }
}
