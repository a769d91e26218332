//! Columnar datasets for symbolic regression.
//!
//! A [`Dataset`] owns (or borrows) a column-major numeric matrix plus a
//! registry mapping column names to stable content hashes. Expression trees
//! reference columns by hash only, so a tree built against one dataset
//! evaluates against any other dataset that defines the same names.
//!
//! Concurrency contract: every query takes `&self` and is safe to call from
//! many threads at once; every mutator takes `&mut self`, so the borrow
//! checker enforces the exclusive access the mutators require.

mod csv;
mod matrix;
mod variable;

pub use matrix::{Matrix, MatrixLayout};
pub use variable::{Variable, VariableRegistry};

use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::{EngineError, EngineResult, VariableQuery};

/// Native scalar element type of the engine.
pub type Scalar = f64;

/// Half-open row interval `[start, end)` used to denote dataset partitions
/// without copying rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: usize,
    end: usize,
}

impl Range {
    /// Create a row range.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "range start must not exceed end");
        Self { start, end }
    }

    /// First row of the interval.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last row of the interval.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of rows in the interval.
    #[must_use]
    pub fn size(&self) -> usize {
        self.end - self.start
    }
}

impl From<(usize, usize)> for Range {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// A 2-D numeric matrix with named, hash-addressable columns.
///
/// The lifetime parameter tracks the zero-copy path: a dataset constructed
/// with [`Dataset::from_column_major`] borrows the caller's buffer for `'a`
/// instead of copying it. Owned constructions use `Dataset<'static>`.
#[derive(Debug)]
pub struct Dataset<'a> {
    matrix: Matrix<'a>,
    registry: VariableRegistry,
}

impl<'a> Dataset<'a> {
    /// Uniform assembly point: every constructor funnels its matrix and
    /// column names through here.
    fn assemble(matrix: Matrix<'a>, names: Vec<String>) -> EngineResult<Self> {
        if names.len() != matrix.cols() {
            return Err(EngineError::Shape {
                expected: matrix.cols(),
                got: names.len(),
            });
        }
        let registry = VariableRegistry::from_names(names)?;
        Ok(Self { matrix, registry })
    }

    /// Load a dataset from a delimited text file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Format`] if the file cannot be read or its
    /// contents are malformed (inconsistent column counts, non-numeric
    /// cells), and [`EngineError::HashCollision`] if header names collide.
    pub fn from_csv_path(path: &Path, has_header: bool) -> EngineResult<Dataset<'static>> {
        let text = fs::read_to_string(path).map_err(|e| EngineError::Format {
            line: 0,
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Dataset::from_csv_str(&text, has_header)
    }

    /// Parse a dataset from delimited text.
    ///
    /// # Errors
    ///
    /// Same contract as [`Dataset::from_csv_path`].
    pub fn from_csv_str(text: &str, has_header: bool) -> EngineResult<Dataset<'static>> {
        let table = csv::parse(text, has_header)?;
        Dataset::assemble(table.matrix, table.names)
    }

    /// Wrap a caller-owned column-major buffer without copying (zero-copy).
    ///
    /// The source must stay alive for the lifetime of the dataset; the
    /// exclusive borrow enforces that and serializes mutation. Columns get
    /// generated names `X1..Xn`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if `data.len() != rows * cols`.
    pub fn from_column_major(data: &'a mut [Scalar], rows: usize, cols: usize) -> EngineResult<Self> {
        let matrix = Matrix::from_view(data, rows, cols)?;
        Self::assemble(matrix, VariableRegistry::default_names(cols))
    }

    /// Copy a row-major buffer into an owned column-major dataset.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if `data.len() != rows * cols`.
    pub fn from_row_major(data: &[Scalar], rows: usize, cols: usize) -> EngineResult<Dataset<'static>> {
        let matrix = Matrix::from_row_major(data, rows, cols)?;
        Dataset::assemble(matrix, VariableRegistry::default_names(cols))
    }

    /// Copy and widen an `f32` buffer into an owned dataset.
    ///
    /// Narrower source scalars can never be wrapped zero-copy; this path
    /// always materializes an owned column-major copy.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if `data.len() != rows * cols`.
    pub fn from_f32(
        data: &[f32],
        rows: usize,
        cols: usize,
        layout: MatrixLayout,
    ) -> EngineResult<Dataset<'static>> {
        let matrix = Matrix::from_f32(data, rows, cols, layout)?;
        Dataset::assemble(matrix, VariableRegistry::default_names(cols))
    }

    /// Build a dataset from a sequence of equal-length columns.
    ///
    /// The outer sequence is the columns, the inner sequences the rows.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if the columns have differing lengths.
    pub fn from_columns(columns: &[Vec<Scalar>]) -> EngineResult<Dataset<'static>> {
        let matrix = Matrix::from_columns(columns)?;
        let cols = matrix.cols();
        Dataset::assemble(matrix, VariableRegistry::default_names(cols))
    }

    /// Replace the generated column names, consuming and returning the
    /// dataset.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if the name count differs from the
    /// column count, or [`EngineError::HashCollision`] on colliding names.
    pub fn with_names<I, S>(mut self, names: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.set_names(names)?;
        Ok(self)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.matrix.cols()
    }

    /// Whether the dataset borrows caller-owned memory (zero-copy path).
    #[must_use]
    pub fn is_view(&self) -> bool {
        self.matrix.is_view()
    }

    /// Read-only, zero-copy view over the column at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the index is out of range.
    pub fn values(&self, index: usize) -> EngineResult<&[Scalar]> {
        if index >= self.matrix.cols() {
            return Err(EngineError::NotFound(VariableQuery::Index(index)));
        }
        Ok(self.matrix.column(index))
    }

    /// Read-only view over the column named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no column has this name.
    pub fn values_by_name(&self, name: &str) -> EngineResult<&[Scalar]> {
        let index = self.registry.by_name(name)?.index;
        Ok(self.matrix.column(index))
    }

    /// Read-only view over the column whose name hashes to `hash`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no column has this hash.
    pub fn values_by_hash(&self, hash: u64) -> EngineResult<&[Scalar]> {
        let index = self.registry.by_hash(hash)?.index;
        Ok(self.matrix.column(index))
    }

    /// Look up a variable by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no column has this name.
    pub fn variable(&self, name: &str) -> EngineResult<&Variable> {
        self.registry.by_name(name)
    }

    /// Look up a variable by content hash.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no column has this hash.
    pub fn variable_by_hash(&self, hash: u64) -> EngineResult<&Variable> {
        self.registry.by_hash(hash)
    }

    /// All variables in column order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        self.registry.variables()
    }

    /// Column names in column order.
    #[must_use]
    pub fn variable_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Rename every column, re-deriving every hash.
    ///
    /// This is the only operation that changes variable identity after
    /// construction. Hashes captured before the rename stop resolving.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Shape`] if the name count differs from the
    /// column count, or [`EngineError::HashCollision`] on colliding names.
    pub fn set_variable_names<I, S>(&mut self, names: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.set_names(names)
    }

    /// Randomly permute the rows in place.
    ///
    /// One Fisher-Yates permutation is applied across all columns, so rows
    /// stay aligned. Deterministic for a fixed engine state.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        for i in (1..self.matrix.rows()).rev() {
            let j = rng.gen_range(0..=i);
            self.matrix.swap_rows(i, j);
        }
    }

    fn check_range(&self, range: Range) -> EngineResult<()> {
        if range.end() > self.matrix.rows() {
            return Err(EngineError::Shape {
                expected: self.matrix.rows(),
                got: range.end(),
            });
        }
        Ok(())
    }

    /// Min-max rescale one column to `[0, 1]`, restricted to `range`.
    ///
    /// Rows outside the range are untouched. A degenerate segment where all
    /// values are equal rescales to 0.0.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for an unknown column index and
    /// [`EngineError::Shape`] if the range exceeds the row count.
    pub fn normalize(&mut self, column: usize, range: Range) -> EngineResult<()> {
        if column >= self.matrix.cols() {
            return Err(EngineError::NotFound(VariableQuery::Index(column)));
        }
        self.check_range(range)?;

        let segment = &mut self.matrix.column_mut(column)[range.start()..range.end()];
        let min = segment.iter().copied().fold(Scalar::INFINITY, Scalar::min);
        let max = segment.iter().copied().fold(Scalar::NEG_INFINITY, Scalar::max);
        let span = max - min;
        if span.abs() > 0.0 {
            for value in segment {
                *value = (*value - min) / span;
            }
        } else {
            segment.fill(0.0);
        }
        Ok(())
    }

    /// Z-score rescale one column restricted to `range`, using the mean and
    /// population variance of that range only.
    ///
    /// Rows outside the range are untouched. A zero-variance segment
    /// rescales to 0.0.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for an unknown column index and
    /// [`EngineError::Shape`] if the range exceeds the row count.
    #[allow(clippy::cast_precision_loss)]
    pub fn standardize(&mut self, column: usize, range: Range) -> EngineResult<()> {
        if column >= self.matrix.cols() {
            return Err(EngineError::NotFound(VariableQuery::Index(column)));
        }
        self.check_range(range)?;
        if range.size() == 0 {
            return Ok(());
        }

        let segment = &mut self.matrix.column_mut(column)[range.start()..range.end()];
        let n = segment.len() as Scalar;
        let mean = segment.iter().sum::<Scalar>() / n;
        let variance = segment.iter().map(|v| (v - mean).powi(2)).sum::<Scalar>() / n;
        let std = variance.sqrt();
        if std.abs() > 0.0 {
            for value in segment {
                *value = (*value - mean) / std;
            }
        } else {
            segment.fill(0.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sample() -> Dataset<'static> {
        // [[1,2],[3,4],[5,6]] with columns x, y
        Dataset::from_row_major(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2)
            .and_then(|d| d.with_names(["x", "y"]))
            .unwrap()
    }

    #[test]
    fn test_concrete_example() {
        let ds = sample();
        assert_eq!(ds.rows(), 3);
        assert_eq!(ds.cols(), 2);
        assert_eq!(ds.values_by_name("x").unwrap(), &[1.0, 3.0, 5.0]);
        assert_eq!(ds.values_by_name("y").unwrap(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_shape_invariant() {
        let ds = sample();
        assert_eq!(ds.variables().len(), ds.cols());
        for (i, var) in ds.variables().iter().enumerate() {
            assert_eq!(var.index, i);
        }
    }

    #[test]
    fn test_zero_copy_view_aliases_source() {
        let mut source = vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0];
        let base = source.as_ptr();
        let ds = Dataset::from_column_major(&mut source, 3, 2).unwrap();
        assert!(ds.is_view());
        assert_eq!(ds.values(0).unwrap().as_ptr(), base);
    }

    #[test]
    fn test_view_mutation_writes_through() {
        let mut source = vec![3.0, 1.0, 2.0, 30.0, 10.0, 20.0];
        {
            let mut ds = Dataset::from_column_major(&mut source, 3, 2).unwrap();
            let mut rng = SmallRng::seed_from_u64(7);
            ds.shuffle(&mut rng);
        }
        // The permutation happened in the caller's buffer; both columns were
        // permuted identically.
        let x: Vec<Scalar> = source[..3].to_vec();
        let y: Vec<Scalar> = source[3..].to_vec();
        for (a, b) in x.iter().zip(&y) {
            assert_eq!(*a * 10.0, *b);
        }
    }

    #[test]
    fn test_owned_copy_does_not_alias() {
        let source = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ds = Dataset::from_row_major(&source, 3, 2).unwrap();
        assert!(!ds.is_view());
        let view = ds.values(0).unwrap();
        let source_range = source.as_ptr()..source.as_ptr().wrapping_add(source.len());
        assert!(!source_range.contains(&view.as_ptr()));
    }

    #[test]
    fn test_unknown_lookups_fail() {
        let ds = sample();
        assert!(ds.values_by_name("z").is_err());
        assert!(ds.values_by_hash(0xdead_beef).is_err());
        assert!(ds.values(2).is_err());
    }

    #[test]
    fn test_rename_invalidates_old_hash() {
        let mut ds = sample();
        let old_hash = ds.variable("x").unwrap().hash;

        ds.set_variable_names(["a", "b"]).unwrap();

        assert!(ds.values_by_hash(old_hash).is_err());
        assert_eq!(ds.variable("a").unwrap().index, 0);
    }

    #[test]
    fn test_shuffle_is_deterministic_and_preserves_rows() {
        let mut a = sample();
        let mut b = sample();
        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut rng_b = SmallRng::seed_from_u64(42);

        a.shuffle(&mut rng_a);
        b.shuffle(&mut rng_b);

        assert_eq!(a.values(0).unwrap(), b.values(0).unwrap());

        // Rows stay aligned: y == x + 1 in the sample data.
        let x = a.values_by_name("x").unwrap().to_vec();
        let y = a.values_by_name("y").unwrap().to_vec();
        for (xv, yv) in x.iter().zip(&y) {
            assert_eq!(xv + 1.0, *yv);
        }
    }

    #[test]
    fn test_normalize_boundary() {
        let mut ds = Dataset::from_columns(&[vec![5.0, 1.0, 3.0, 9.0]]).unwrap();
        ds.normalize(0, Range::new(0, 3)).unwrap();

        let values = ds.values(0).unwrap();
        let min = values[..3].iter().copied().fold(Scalar::INFINITY, Scalar::min);
        let max = values[..3].iter().copied().fold(Scalar::NEG_INFINITY, Scalar::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
        // Outside the range: untouched.
        assert_eq!(values[3], 9.0);
    }

    #[test]
    fn test_normalize_degenerate_segment() {
        let mut ds = Dataset::from_columns(&[vec![4.0, 4.0, 4.0]]).unwrap();
        ds.normalize(0, Range::new(0, 3)).unwrap();
        assert_eq!(ds.values(0).unwrap(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_standardize_range_only() {
        let mut ds = Dataset::from_columns(&[vec![1.0, 2.0, 3.0, 100.0]]).unwrap();
        ds.standardize(0, Range::new(0, 3)).unwrap();

        let values = ds.values(0).unwrap();
        let mean: Scalar = values[..3].iter().sum::<Scalar>() / 3.0;
        assert!(mean.abs() < 1e-12);
        assert_eq!(values[3], 100.0);
    }

    #[test]
    fn test_range_size() {
        let range = Range::new(2, 7);
        assert_eq!(range.size(), 5);
        assert_eq!(Range::from((0, 3)).end(), 3);
    }

    #[test]
    fn test_out_of_range_mutation_fails() {
        let mut ds = sample();
        assert!(ds.normalize(5, Range::new(0, 3)).is_err());
        assert!(ds.normalize(0, Range::new(0, 99)).is_err());
    }
}
