//! Row-major 2D grids used for frames, images and display buffers.

use std::ops::Range;

use thiserror::Error;

/// Errors returned by grid construction and element-wise operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("grid shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("crop window rows {rows:?} cols {cols:?} exceeds grid shape {shape:?}")]
    CropOutOfBounds {
        rows: Range<usize>,
        cols: Range<usize>,
        shape: (usize, usize),
    },
}

/// Fixed-shape 2D grid stored row-major.
///
/// # Examples
/// ```
/// use dmlextract_core::Grid;
///
/// let grid = Grid::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6])?;
/// assert_eq!(grid.shape(), (2, 3));
/// assert_eq!(grid.get(1, 2), Some(6));
/// # Ok::<(), dmlextract_core::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// One raw 64×96 frame as stored in the input file.
pub type Frame = Grid<i16>;
/// The cropped valid region of a frame.
pub type Image = Grid<i16>;
/// Sum of a difference image and the reference, in a widened domain.
pub type ReconstructedImage = Grid<i32>;
/// 8-bit display rendition of a reconstructed image.
pub type DisplayImage = Grid<u8>;
/// 16-bit display rendition of a reconstructed image.
pub type DisplayImage16 = Grid<u16>;

impl<T: Copy> Grid<T> {
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, GridError> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(GridError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.data.get(start..start + self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Copy out the half-open window `rows × cols`.
    pub fn crop(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self, GridError> {
        if rows.start > rows.end
            || cols.start > cols.end
            || rows.end > self.rows
            || cols.end > self.cols
        {
            return Err(GridError::CropOutOfBounds {
                rows,
                cols,
                shape: self.shape(),
            });
        }
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for row in rows.clone() {
            let start = row * self.cols;
            data.extend_from_slice(&self.data[start + cols.start..start + cols.end]);
        }
        Ok(Self {
            rows: rows.len(),
            cols: cols.len(),
            data,
        })
    }

    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(T) -> U,
    {
        Grid {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Combine two equal-shape grids element by element.
    pub fn zip_with<U, V, F>(&self, other: &Grid<U>, mut f: F) -> Result<Grid<V>, GridError>
    where
        U: Copy,
        F: FnMut(T, U) -> V,
    {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Grid {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Nested row vectors, for serialization.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(|row| row.to_vec()).collect()
    }
}
