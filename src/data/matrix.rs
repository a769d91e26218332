//! Column-major matrix storage with optional zero-copy views.
//!
//! Every ingestion path collapses into one of two storage variants: an owned
//! column-major buffer, or a mutable view over caller-owned memory. The view
//! variant is the zero-copy path; the borrow makes the source outlive the
//! matrix and gives mutators exclusive access to it.

use crate::data::Scalar;
use crate::error::{EngineError, EngineResult};

/// Memory order of a 2-D source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixLayout {
    /// Rows are contiguous: `index = row * cols + col`.
    RowMajor,
    /// Columns are contiguous: `index = col * rows + row`.
    ColumnMajor,
}

#[derive(Debug)]
enum Storage<'a> {
    Owned(Vec<Scalar>),
    View(&'a mut [Scalar]),
}

impl Storage<'_> {
    fn as_slice(&self) -> &[Scalar] {
        match self {
            Storage::Owned(data) => data,
            Storage::View(data) => data,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [Scalar] {
        match self {
            Storage::Owned(data) => data,
            Storage::View(data) => data,
        }
    }
}

/// Dense column-major matrix of [`Scalar`] values.
#[derive(Debug)]
pub struct Matrix<'a> {
    storage: Storage<'a>,
    rows: usize,
    cols: usize,
}

impl<'a> Matrix<'a> {
    /// Take ownership of a column-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if `data.len() != rows * cols`.
    pub fn from_owned(data: Vec<Scalar>, rows: usize, cols: usize) -> EngineResult<Matrix<'static>> {
        check_len(data.len(), rows, cols)?;
        Ok(Matrix {
            storage: Storage::Owned(data),
            rows,
            cols,
        })
    }

    /// Wrap a caller-owned column-major buffer without copying.
    ///
    /// The exclusive borrow keeps the source alive for the lifetime of the
    /// matrix and lets in-place mutators write straight through to it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if `data.len() != rows * cols`.
    pub fn from_view(data: &'a mut [Scalar], rows: usize, cols: usize) -> EngineResult<Self> {
        check_len(data.len(), rows, cols)?;
        Ok(Self {
            storage: Storage::View(data),
            rows,
            cols,
        })
    }

    /// Copy a row-major buffer into owned column-major storage.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if `data.len() != rows * cols`.
    pub fn from_row_major(data: &[Scalar], rows: usize, cols: usize) -> EngineResult<Matrix<'static>> {
        check_len(data.len(), rows, cols)?;
        let mut transposed = vec![0.0; data.len()];
        for row in 0..rows {
            for col in 0..cols {
                transposed[col * rows + row] = data[row * cols + col];
            }
        }
        Matrix::from_owned(transposed, rows, cols)
    }

    /// Copy and widen an `f32` buffer into owned column-major storage.
    ///
    /// A differing scalar width can never be wrapped in place, so this path
    /// always copies, regardless of layout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if `data.len() != rows * cols`.
    pub fn from_f32(
        data: &[f32],
        rows: usize,
        cols: usize,
        layout: MatrixLayout,
    ) -> EngineResult<Matrix<'static>> {
        check_len(data.len(), rows, cols)?;
        let widened: Vec<Scalar> = data.iter().map(|&v| Scalar::from(v)).collect();
        match layout {
            MatrixLayout::ColumnMajor => Matrix::from_owned(widened, rows, cols),
            MatrixLayout::RowMajor => Matrix::from_row_major(&widened, rows, cols),
        }
    }

    /// Build owned storage from a sequence of equal-length columns.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if the columns have differing lengths.
    pub fn from_columns(columns: &[Vec<Scalar>]) -> EngineResult<Matrix<'static>> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows * cols);
        for column in columns {
            if column.len() != rows {
                return Err(EngineError::Shape {
                    expected: rows,
                    got: column.len(),
                });
            }
            data.extend_from_slice(column);
        }
        Matrix::from_owned(data, rows, cols)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether this matrix wraps caller-owned memory (the zero-copy path).
    #[must_use]
    pub fn is_view(&self) -> bool {
        matches!(self.storage, Storage::View(_))
    }

    /// Contiguous view over one column.
    ///
    /// # Panics
    ///
    /// Panics if `index >= cols`. Callers resolve indices through the
    /// variable registry first, which reports unknown columns as errors.
    #[must_use]
    pub fn column(&self, index: usize) -> &[Scalar] {
        assert!(index < self.cols, "column index out of range");
        &self.storage.as_slice()[index * self.rows..(index + 1) * self.rows]
    }

    /// Mutable view over one column.
    ///
    /// # Panics
    ///
    /// Panics if `index >= cols`.
    pub fn column_mut(&mut self, index: usize) -> &mut [Scalar] {
        assert!(index < self.cols, "column index out of range");
        let rows = self.rows;
        &mut self.storage.as_mut_slice()[index * rows..(index + 1) * rows]
    }

    /// Swap two rows across every column.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        let rows = self.rows;
        let data = self.storage.as_mut_slice();
        for col in 0..self.cols {
            data.swap(col * rows + a, col * rows + b);
        }
    }

    /// The full backing slice in column-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[Scalar] {
        self.storage.as_slice()
    }
}

fn check_len(len: usize, rows: usize, cols: usize) -> EngineResult<()> {
    let expected = rows * cols;
    if len == expected {
        Ok(())
    } else {
        Err(EngineError::Shape { expected, got: len })
    }
}
