use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::grid::GridError;
use crate::output::{OutputError, OutputOptions, OutputWriter};
use crate::source::{DmlSource, FrameSource, SourceError};
use crate::transform::reconstruct;
use crate::{ExtractionReport, LayoutInfo, make_stub_report};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("input contains no frames; a reference frame is required")]
    EmptyInput,
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Reconstruction error: {0}")]
    Grid(#[from] GridError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Milestones reported while a run progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Started { frames: usize },
    /// A display image file was written for frame `index`.
    ImageSaved { index: usize },
}

pub fn extract_dml_file<F>(
    input: &Path,
    out_dir: &Path,
    options: OutputOptions,
    on_progress: F,
) -> Result<ExtractionReport, ExtractionError>
where
    F: FnMut(Progress),
{
    let source = DmlSource::open(input)?;
    extract_source(input, source, out_dir, options, on_progress)
}

/// Decode frame 0 as the reference, then reconstruct and persist frames 1...
///
/// Any failure aborts the run; nothing is skipped.
pub fn extract_source<S, F>(
    input: &Path,
    source: S,
    out_dir: &Path,
    options: OutputOptions,
    mut on_progress: F,
) -> Result<ExtractionReport, ExtractionError>
where
    S: FrameSource,
    F: FnMut(Progress),
{
    let frames = source.frame_count();
    if frames == 0 {
        return Err(ExtractionError::EmptyInput);
    }
    info!(input = %input.display(), frames, "extracting frames");
    on_progress(Progress::Started { frames });

    let mut writer = OutputWriter::new(out_dir, options)?;
    let reference = source.read_image(0)?;
    writer.write_reference(&reference)?;

    for index in 1..frames {
        let frame = source.read_image(index)?;
        let image = reconstruct(&frame, &reference)?;
        debug!(index, "reconstructed frame");
        if writer.write_image(index, image)?.is_some() {
            on_progress(Progress::ImageSaved { index });
        }
    }

    let summary = writer.finish()?;
    info!(
        written = summary.written.len(),
        degenerate = summary.degenerate.len(),
        "extraction finished"
    );

    let mut report = make_stub_report(&input.display().to_string(), source.input_bytes());
    report.layout = LayoutInfo::from(source.layout());
    report.frames_total = frames as u64;
    report.images_reconstructed = (frames - 1) as u64;
    report.outputs = summary
        .written
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    report.degenerate_images = summary.degenerate.iter().map(|&i| i as u64).collect();
    Ok(report)
}
