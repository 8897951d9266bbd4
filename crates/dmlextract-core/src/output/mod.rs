//! Persistence of reference and reconstructed images.
//!
//! Two layouts are supported, selected by [`OutputStrategy`]:
//! - `PerFileAndRawArray`: every image as `00000.png`, `00001.png`, ... with
//!   the reference at index 0, plus an optional packed `all_raw.npy`.
//! - `ReferencePlusRecord`: `reference_image.png` and `extracted_data.json`
//!   holding all reconstructed images, plus optional per-image PNGs numbered
//!   from 0 after the reference.
//!
//! Display PNGs are normalized per image; the packed array and the record keep
//! the unnormalized values.

pub mod npy;
mod png;
mod record;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::grid::{GridError, Image, ReconstructedImage};
use crate::transform::{is_degenerate, normalize, normalize_u16, widen};

pub use record::{ExtractedRecord, read_record, write_record};

pub const IMAGE_FILE_DIGITS: usize = 5;
pub const IMAGE_FILE_EXT: &str = "png";
pub const REFERENCE_IMAGE_FILE: &str = "reference_image.png";
pub const RAW_ARRAY_FILE: &str = "all_raw.npy";
pub const RECORD_FILE: &str = "extracted_data.json";

/// Zero-padded indexed image file name.
///
/// # Examples
/// ```
/// use dmlextract_core::output::image_file_name;
///
/// assert_eq!(image_file_name(7), "00007.png");
/// ```
pub fn image_file_name(index: usize) -> String {
    format!("{index:0width$}.{IMAGE_FILE_EXT}", width = IMAGE_FILE_DIGITS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStrategy {
    PerFileAndRawArray { save_raw_array: bool },
    ReferencePlusRecord { save_all_images: bool },
}

impl Default for OutputStrategy {
    fn default() -> Self {
        OutputStrategy::PerFileAndRawArray {
            save_raw_array: true,
        }
    }
}

/// Bit depth of display PNGs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayDepth {
    #[default]
    Eight,
    Sixteen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub strategy: OutputStrategy,
    pub depth: DisplayDepth,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PNG encoding failed for {}: {source}", path.display())]
    Png {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("record serialization failed for {}: {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("NPY encoding failed for {}: {reason}", path.display())]
    Npy { path: PathBuf, reason: &'static str },
    #[error("cannot build image buffer of shape {shape:?} for {}", path.display())]
    Buffer { path: PathBuf, shape: (usize, usize) },
    #[error("image {index} written before the reference image")]
    MissingReference { index: usize },
    #[error("index 0 is reserved for the reference image")]
    ReferenceIndex,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Files written by a run and images that had nothing to normalize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSummary {
    pub written: Vec<PathBuf>,
    pub degenerate: Vec<usize>,
}

/// Applies an [`OutputStrategy`] to a stream of images.
///
/// Call `write_reference` once, then `write_image` for indices 1.., then
/// `finish` to flush the packed array or record.
pub struct OutputWriter {
    out_dir: PathBuf,
    options: OutputOptions,
    reference: Option<ReconstructedImage>,
    retained: Vec<ReconstructedImage>,
    summary: OutputSummary,
}

impl OutputWriter {
    pub fn new(out_dir: &Path, options: OutputOptions) -> Result<Self, OutputError> {
        if !out_dir.is_dir() {
            return Err(OutputError::MissingDirectory(out_dir.to_path_buf()));
        }
        Ok(Self {
            out_dir: out_dir.to_path_buf(),
            options,
            reference: None,
            retained: Vec::new(),
            summary: OutputSummary::default(),
        })
    }

    pub fn write_reference(&mut self, reference: &Image) -> Result<(), OutputError> {
        let widened = widen(reference);
        let name = match self.options.strategy {
            OutputStrategy::PerFileAndRawArray { .. } => image_file_name(0),
            OutputStrategy::ReferencePlusRecord { .. } => REFERENCE_IMAGE_FILE.to_string(),
        };
        self.write_display(&name, &widened, 0)?;
        self.reference = Some(widened);
        Ok(())
    }

    /// Persist reconstructed frame `index`. Returns the path of the display
    /// image when one was written for it.
    pub fn write_image(
        &mut self,
        index: usize,
        image: ReconstructedImage,
    ) -> Result<Option<PathBuf>, OutputError> {
        if self.reference.is_none() {
            return Err(OutputError::MissingReference { index });
        }
        let position = index.checked_sub(1).ok_or(OutputError::ReferenceIndex)?;
        let written = match self.options.strategy {
            OutputStrategy::PerFileAndRawArray { save_raw_array } => {
                let path = self.write_display(&image_file_name(index), &image, index)?;
                if save_raw_array {
                    self.retained.push(image);
                }
                Some(path)
            }
            OutputStrategy::ReferencePlusRecord { save_all_images } => {
                let path = if save_all_images {
                    Some(self.write_display(&image_file_name(position), &image, index)?)
                } else {
                    None
                };
                self.retained.push(image);
                path
            }
        };
        Ok(written)
    }

    pub fn finish(mut self) -> Result<OutputSummary, OutputError> {
        let Some(reference) = self.reference.take() else {
            return Ok(self.summary);
        };
        match self.options.strategy {
            OutputStrategy::PerFileAndRawArray {
                save_raw_array: true,
            } => {
                let path = self.out_dir.join(RAW_ARRAY_FILE);
                let mut stack = Vec::with_capacity(self.retained.len() + 1);
                stack.push(reference);
                stack.append(&mut self.retained);
                npy::write_stack(&path, &stack)?;
                debug!(path = %path.display(), images = stack.len(), "wrote raw array");
                self.summary.written.push(path);
            }
            OutputStrategy::PerFileAndRawArray {
                save_raw_array: false,
            } => {}
            OutputStrategy::ReferencePlusRecord { .. } => {
                let path = self.out_dir.join(RECORD_FILE);
                let record = ExtractedRecord::new(&reference, &self.retained);
                write_record(&path, &record)?;
                debug!(path = %path.display(), images = record.images.len(), "wrote record");
                self.summary.written.push(path);
            }
        }
        Ok(self.summary)
    }

    fn write_display(
        &mut self,
        name: &str,
        image: &ReconstructedImage,
        index: usize,
    ) -> Result<PathBuf, OutputError> {
        if is_degenerate(image) {
            warn!(index, "image has no non-zero pixels; writing all-zero display image");
            self.summary.degenerate.push(index);
        }
        let path = self.out_dir.join(name);
        match self.options.depth {
            DisplayDepth::Eight => png::write_gray8(&path, &normalize(image))?,
            DisplayDepth::Sixteen => png::write_gray16(&path, &normalize_u16(image))?,
        }
        self.summary.written.push(path.clone());
        Ok(path)
    }
}
