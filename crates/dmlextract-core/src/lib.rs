//! Core library for extracting difference images from `.dml` frame files.
//!
//! A `.dml` file is a headerless sequence of fixed-size 64×96 frames of
//! little-endian `i16` samples. Frame 0 is the reference; every later frame is
//! a difference image that is added to the reference to reconstruct the
//! actual image. Reconstructed images are persisted as per-image PNGs plus a
//! packed NPY array, or as a reference PNG plus a JSON record.
//!
//! Pipeline: `source` (file I/O) -> `format::dml` (layout/reader/parser) ->
//! `transform` (reconstruct, normalize) -> `output` (persistence). Decoding
//! and transforms are pure; all file access lives in `source` and `output`.
//!
//! Invariants:
//! - The input length is an exact multiple of the frame size, checked before
//!   any frame is decoded.
//! - Frame 0 is never reconstructed; it is used verbatim as the reference.
//! - Display normalization is per image and deterministic.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use dmlextract_core::{OutputOptions, extract_dml_file};
//!
//! let report = extract_dml_file(
//!     Path::new("capture.dml"),
//!     Path::new("out"),
//!     OutputOptions::default(),
//!     |_| {},
//! )?;
//! println!("frames: {}", report.frames_total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod extract;
pub mod format;
mod grid;
pub mod output;
mod source;
pub mod transform;

pub use extract::{ExtractionError, Progress, extract_dml_file, extract_source};
pub use format::dml::{DmlError, FrameLayout};
pub use grid::{
    DisplayImage, DisplayImage16, Frame, Grid, GridError, Image, ReconstructedImage,
};
pub use output::{DisplayDepth, OutputError, OutputOptions, OutputStrategy};
pub use source::{DmlSource, FrameSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller does not stamp the report.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Summary of one extraction run.
///
/// # Examples
/// ```
/// use dmlextract_core::make_stub_report;
///
/// let report = make_stub_report("capture.dml", 24576);
/// assert_eq!(report.report_version, dmlextract_core::REPORT_VERSION);
/// assert_eq!(report.layout.image_shape, [60, 89]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp of report generation.
    pub generated_at: String,
    pub input: InputInfo,
    pub layout: LayoutInfo,
    /// Frames in the input, reference included.
    pub frames_total: u64,
    /// Frames reconstructed against the reference.
    pub images_reconstructed: u64,
    /// Files written, in write order.
    pub outputs: Vec<String>,
    /// Frame indices whose display image had no signal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degenerate_images: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the extractor.
    pub path: String,
    pub bytes: u64,
}

/// Frame geometry used for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub frame_shape: [usize; 2],
    pub image_shape: [usize; 2],
    pub frame_bytes: usize,
}

impl From<&FrameLayout> for LayoutInfo {
    fn from(layout: &FrameLayout) -> Self {
        let (frame_rows, frame_cols) = layout.frame_shape();
        let (image_rows, image_cols) = layout.image_shape();
        Self {
            frame_shape: [frame_rows, frame_cols],
            image_shape: [image_rows, image_cols],
            frame_bytes: layout.frame_bytes(),
        }
    }
}

/// Build a report with base fields filled and empty results.
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> ExtractionReport {
    ExtractionReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "dmlextract".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        layout: LayoutInfo::from(&FrameLayout::DML),
        frames_total: 0,
        images_reconstructed: 0,
        outputs: vec![],
        degenerate_images: vec![],
    }
}
