use super::error::DmlError;
use super::layout::PIXEL_BYTES;

/// Bounds-checked access to fixed-size frames inside a raw buffer.
pub struct DmlReader<'a> {
    buffer: &'a [u8],
    frame_bytes: usize,
}

impl<'a> DmlReader<'a> {
    pub fn new(buffer: &'a [u8], frame_bytes: usize) -> Self {
        Self {
            buffer,
            frame_bytes,
        }
    }

    pub fn require_len(&self, index: usize, needed: usize) -> Result<(), DmlError> {
        if self.buffer.len() < needed {
            return Err(DmlError::MalformedInput {
                index,
                needed,
                actual: self.buffer.len(),
            });
        }
        Ok(())
    }

    /// Byte range of frame `index`: `[index * frame_bytes, (index + 1) * frame_bytes)`.
    pub fn frame_slice(&self, index: usize) -> Result<&'a [u8], DmlError> {
        let overflow = DmlError::MalformedInput {
            index,
            needed: usize::MAX,
            actual: self.buffer.len(),
        };
        let start = index.checked_mul(self.frame_bytes).ok_or(overflow.clone())?;
        let end = start.checked_add(self.frame_bytes).ok_or(overflow)?;
        self.require_len(index, end)?;
        self.buffer
            .get(start..end)
            .ok_or(DmlError::MalformedInput {
                index,
                needed: end,
                actual: self.buffer.len(),
            })
    }

    /// Little-endian `i16` samples of frame `index`, in file order.
    pub fn read_samples(&self, index: usize) -> Result<Vec<i16>, DmlError> {
        let bytes = self.frame_slice(index)?;
        Ok(bytes
            .chunks_exact(PIXEL_BYTES)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }
}
