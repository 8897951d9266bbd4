use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::ReconstructedImage;

use super::OutputError;

/// Reference image plus every reconstructed image, as nested rows.
///
/// # Examples
/// ```
/// use dmlextract_core::Grid;
/// use dmlextract_core::output::ExtractedRecord;
///
/// let reference = Grid::filled(2, 2, 0);
/// let record = ExtractedRecord::new(&reference, &[Grid::filled(2, 2, 5)]);
/// assert_eq!(record.images.len(), 1);
/// assert_eq!(record.images[0][1], vec![5, 5]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub reference_image: Vec<Vec<i32>>,
    pub images: Vec<Vec<Vec<i32>>>,
}

impl ExtractedRecord {
    pub fn new(reference: &ReconstructedImage, images: &[ReconstructedImage]) -> Self {
        Self {
            reference_image: reference.to_rows(),
            images: images.iter().map(|image| image.to_rows()).collect(),
        }
    }
}

pub fn write_record(path: &Path, record: &ExtractedRecord) -> Result<(), OutputError> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, record).map_err(|source| OutputError::Record {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_record(path: &Path) -> Result<ExtractedRecord, OutputError> {
    let file = File::open(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| OutputError::Record {
        path: path.to_path_buf(),
        source,
    })
}
