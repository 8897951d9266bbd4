use std::fs;
use std::path::{Path, PathBuf};

use dmlextract_core::output::{RAW_ARRAY_FILE, RECORD_FILE, npy, read_record};
use dmlextract_core::{
    DmlError, ExtractionError, OutputOptions, OutputStrategy, SourceError, extract_dml_file,
};

const FRAME_SAMPLES: usize = 64 * 96;

fn frame_of(value: i16) -> Vec<u8> {
    std::iter::repeat_n(value.to_le_bytes(), FRAME_SAMPLES)
        .flatten()
        .collect()
}

fn write_dml(dir: &Path, frames: &[i16]) -> PathBuf {
    let path = dir.join("input.dml");
    let bytes: Vec<u8> = frames.iter().flat_map(|&v| frame_of(v)).collect();
    fs::write(&path, bytes).unwrap();
    path
}

fn per_file(save_raw_array: bool) -> OutputOptions {
    OutputOptions {
        strategy: OutputStrategy::PerFileAndRawArray { save_raw_array },
        ..OutputOptions::default()
    }
}

fn record(save_all_images: bool) -> OutputOptions {
    OutputOptions {
        strategy: OutputStrategy::ReferencePlusRecord { save_all_images },
        ..OutputOptions::default()
    }
}

fn read_npy_i32(path: &Path) -> (String, Vec<i32>) {
    let bytes = fs::read(path).unwrap();
    let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let header = String::from_utf8(bytes[10..10 + len].to_vec()).unwrap();
    let values = bytes[10 + len..]
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    (header, values)
}

#[test]
fn two_frames_reconstruct_and_saturate() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_dml(work.path(), &[0, 100]);

    let report = extract_dml_file(&input, out.path(), per_file(true), |_| {}).unwrap();
    assert_eq!(report.frames_total, 2);
    assert_eq!(report.images_reconstructed, 1);
    assert_eq!(report.input.bytes, 24576);
    assert_eq!(report.degenerate_images, vec![0]);

    let reference = image::open(out.path().join("00000.png")).unwrap().into_luma8();
    assert_eq!(reference.dimensions(), (89, 60));
    assert!(reference.pixels().all(|p| p.0[0] == 0));

    let first = image::open(out.path().join("00001.png")).unwrap().into_luma8();
    assert_eq!(first.dimensions(), (89, 60));
    assert!(first.pixels().all(|p| p.0[0] == 255));

    let (header, values) = read_npy_i32(&out.path().join(RAW_ARRAY_FILE));
    assert!(header.contains("'descr': '<i4'"));
    assert!(header.contains("'shape': (2, 60, 89)"));
    let (reference_values, image_values) = values.split_at(60 * 89);
    assert!(reference_values.iter().all(|&v| v == 0));
    assert!(image_values.iter().all(|&v| v == 100));
}

#[test]
fn single_frame_produces_only_reference() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_dml(work.path(), &[0]);

    let report = extract_dml_file(&input, out.path(), record(false), |_| {}).unwrap();
    assert_eq!(report.frames_total, 1);
    assert_eq!(report.images_reconstructed, 0);
    assert!(out.path().join("reference_image.png").exists());

    let saved = read_record(&out.path().join(RECORD_FILE)).unwrap();
    assert_eq!(saved.reference_image.len(), 60);
    assert_eq!(saved.reference_image[0].len(), 89);
    assert!(saved.images.is_empty());
}

#[test]
fn record_mode_keeps_unnormalized_sums() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_dml(work.path(), &[30_000, 30_000, -5]);

    extract_dml_file(&input, out.path(), record(true), |_| {}).unwrap();

    let saved = read_record(&out.path().join(RECORD_FILE)).unwrap();
    assert_eq!(saved.images.len(), 2);
    assert!(saved.images[0].iter().flatten().all(|&v| v == 60_000));
    assert!(saved.images[1].iter().flatten().all(|&v| v == 29_995));
    assert!(out.path().join("00000.png").exists());
    assert!(out.path().join("00001.png").exists());
    assert!(!out.path().join("00002.png").exists());
}

#[test]
fn truncated_input_fails_before_any_output() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = work.path().join("short.dml");
    fs::write(&input, vec![0u8; 12000]).unwrap();

    let err = extract_dml_file(&input, out.path(), per_file(true), |_| {}).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::Source(SourceError::Format(DmlError::SizeMismatch { .. }))
    ));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn repeated_runs_are_identical() {
    let work = tempfile::tempdir().unwrap();
    let input = write_dml(work.path(), &[3, 17, -40]);

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    extract_dml_file(&input, first.path(), per_file(true), |_| {}).unwrap();
    extract_dml_file(&input, second.path(), per_file(true), |_| {}).unwrap();

    for name in ["00000.png", "00001.png", "00002.png", RAW_ARRAY_FILE] {
        let a = fs::read(first.path().join(name)).unwrap();
        let b = fs::read(second.path().join(name)).unwrap();
        assert_eq!(a, b, "{name} differs between runs");
    }
}

#[test]
fn raw_array_header_matches_writer() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_dml(work.path(), &[1, 2, 3]);

    extract_dml_file(&input, out.path(), per_file(true), |_| {}).unwrap();
    let bytes = fs::read(out.path().join(RAW_ARRAY_FILE)).unwrap();
    let header = npy::encode_header(npy::I32_DESCR, &[3, 60, 89]).unwrap();
    assert_eq!(&bytes[..header.len()], &header[..]);
    assert_eq!(bytes.len(), header.len() + 3 * 60 * 89 * 4);
}
