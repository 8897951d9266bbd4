//! Minimal NPY v1.0 writer for packed `int32` arrays.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::grid::{GridError, ReconstructedImage};

use super::OutputError;

pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";
pub const NPY_VERSION: [u8; 2] = [1, 0];
pub const NPY_ALIGNMENT: usize = 64;
pub const I32_DESCR: &str = "<i4";

const PREAMBLE_LEN: usize = NPY_MAGIC.len() + NPY_VERSION.len() + 2;

/// Build the full NPY preamble (magic, version, length, padded header dict).
///
/// # Examples
/// ```
/// use dmlextract_core::output::npy::encode_header;
///
/// let header = encode_header("<i4", &[2, 60, 89]).unwrap();
/// assert_eq!(header.len() % 64, 0);
/// assert!(header.ends_with(b"\n"));
/// ```
pub fn encode_header(descr: &str, shape: &[usize]) -> Option<Vec<u8>> {
    let dims = match shape {
        [single] => format!("({single},)"),
        _ => format!(
            "({})",
            shape
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    let mut dict = format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {dims}, }}");
    let unpadded = PREAMBLE_LEN + dict.len() + 1;
    let padding = (NPY_ALIGNMENT - unpadded % NPY_ALIGNMENT) % NPY_ALIGNMENT;
    dict.push_str(&" ".repeat(padding));
    dict.push('\n');

    let header_len = u16::try_from(dict.len()).ok()?;
    let mut out = Vec::with_capacity(PREAMBLE_LEN + dict.len());
    out.extend_from_slice(NPY_MAGIC);
    out.extend_from_slice(&NPY_VERSION);
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    Some(out)
}

/// Stack equal-shape images into one `(N, rows, cols)` little-endian `int32` array.
pub fn write_stack(path: &Path, images: &[ReconstructedImage]) -> Result<(), OutputError> {
    let (rows, cols) = images.first().map(|img| img.shape()).unwrap_or((0, 0));
    for image in images {
        if image.shape() != (rows, cols) {
            return Err(GridError::ShapeMismatch {
                left: (rows, cols),
                right: image.shape(),
            }
            .into());
        }
    }

    let header = encode_header(I32_DESCR, &[images.len(), rows, cols]).ok_or_else(|| {
        OutputError::Npy {
            path: path.to_path_buf(),
            reason: "header exceeds NPY v1.0 limit",
        }
    })?;

    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    writer.write_all(&header).map_err(io_err)?;
    for image in images {
        for value in image.as_slice() {
            writer.write_all(&value.to_le_bytes()).map_err(io_err)?;
        }
    }
    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::{NPY_MAGIC, encode_header, write_stack};
    use crate::grid::Grid;
    use crate::output::OutputError;

    fn header_text(bytes: &[u8]) -> &str {
        let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        std::str::from_utf8(&bytes[10..10 + len]).unwrap()
    }

    #[test]
    fn header_is_aligned_and_describes_shape() {
        let header = encode_header("<i4", &[3, 60, 89]).unwrap();
        assert_eq!(&header[..6], NPY_MAGIC);
        assert_eq!(&header[6..8], &[1, 0]);
        assert_eq!(header.len() % 64, 0);
        let text = header_text(&header);
        assert!(text.starts_with("{'descr': '<i4', 'fortran_order': False, 'shape': (3, 60, 89), }"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn one_dimensional_shape_has_trailing_comma() {
        let header = encode_header("<i4", &[5]).unwrap();
        assert!(header_text(&header).contains("'shape': (5,)"));
    }

    #[test]
    fn write_stack_emits_little_endian_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_raw.npy");
        let images = vec![
            Grid::from_vec(1, 2, vec![1, -1]).unwrap(),
            Grid::from_vec(1, 2, vec![70000, 0]).unwrap(),
        ];
        write_stack(&path, &images).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let header = encode_header("<i4", &[2, 1, 2]).unwrap();
        assert_eq!(&bytes[..header.len()], &header[..]);
        let payload: Vec<i32> = bytes[header.len()..]
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(payload, vec![1, -1, 70000, 0]);
    }

    #[test]
    fn write_stack_rejects_mixed_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.npy");
        let images = vec![Grid::filled(1, 2, 0), Grid::filled(2, 1, 0)];
        let err = write_stack(&path, &images).unwrap_err();
        assert!(matches!(err, OutputError::Grid(_)));
    }
}
