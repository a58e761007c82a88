use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};
use std::fmt;

/// Row and column coordinate. Negative indices are accepted by the parser.
pub type Index = i64;
/// Stored cell value.
pub type Value = i64;

/// Represents a sparse integer matrix as a two-level ordered map (row -> col -> value).
///
/// Cells without an entry are implicit zeros. A row key is only present while it
/// holds at least one entry, but stored entries may themselves be zero: arithmetic
/// keeps the zero results it computes (see [`SparseMatrix::pruned`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseMatrix {
    rows: BTreeMap<Index, BTreeMap<Index, Value>>,
}

impl SparseMatrix {
    /// Creates a new empty SparseMatrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at (`row`, `col`), replacing and returning any previous value.
    pub fn insert(&mut self, row: Index, col: Index, value: Value) -> Option<Value> {
        self.rows.entry(row).or_default().insert(col, value)
    }

    /// Gets the stored value at a specific row and column.
    pub fn get(&self, row: Index, col: Index) -> Option<Value> {
        self.rows.get(&row)?.get(&col).copied()
    }

    /// Gets the value at a specific row and column, treating missing entries as zero.
    pub fn value_at(&self, row: Index, col: Index) -> Value {
        self.get(row, col).unwrap_or(0)
    }

    /// Returns the stored entries of one row, keyed by column.
    pub fn row(&self, row: Index) -> Option<&BTreeMap<Index, Value>> {
        self.rows.get(&row)
    }

    /// Iterates over the stored rows in ascending order.
    pub fn rows(&self) -> btree_map::Iter<'_, Index, BTreeMap<Index, Value>> {
        self.rows.iter()
    }

    /// Number of rows holding at least one entry.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of stored elements, explicit zeros included.
    pub fn nnz(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_explicit_zeros(&self) -> bool {
        self.iter().any(|t| t.value == 0)
    }

    /// Returns a copy without the entries whose stored value is zero.
    pub fn pruned(&self) -> Self {
        self.iter().filter(|t| t.value != 0).collect()
    }

    /// Entrywise negation. Stored zeros stay stored, and `i64::MIN` saturates to `i64::MAX`.
    pub fn negated(&self) -> Self {
        self.iter()
            .map(|t| Triplet::new(t.row, t.col, t.value.saturating_neg()))
            .collect()
    }

    pub fn iter(&self) -> SparseMatrixIter<'_> {
        SparseMatrixIter {
            rows: self.rows.iter(),
            current: None,
        }
    }
}

/// A single stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triplet {
    pub row: Index,
    pub col: Index,
    pub value: Value,
}

impl Triplet {
    pub fn new(row: Index, col: Index, value: Value) -> Self {
        Triplet { row, col, value }
    }
}

impl From<(Index, Index, Value)> for Triplet {
    fn from((row, col, value): (Index, Index, Value)) -> Self {
        Triplet::new(row, col, value)
    }
}

/// Iterates entries in ascending row order, then ascending column order.
pub struct SparseMatrixIter<'a> {
    rows: btree_map::Iter<'a, Index, BTreeMap<Index, Value>>,
    current: Option<(Index, btree_map::Iter<'a, Index, Value>)>,
}

impl Iterator for SparseMatrixIter<'_> {
    type Item = Triplet;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((row, cols)) = self.current.as_mut() {
                if let Some((&col, &value)) = cols.next() {
                    return Some(Triplet::new(*row, col, value));
                }
            }
            let (&row, cols) = self.rows.next()?;
            self.current = Some((row, cols.iter()));
        }
    }
}

impl<'a> IntoIterator for &'a SparseMatrix {
    type Item = Triplet;
    type IntoIter = SparseMatrixIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Later triplets for the same coordinate overwrite earlier ones.
impl FromIterator<Triplet> for SparseMatrix {
    fn from_iter<I: IntoIterator<Item = Triplet>>(iter: I) -> Self {
        let mut matrix = SparseMatrix::new();
        for Triplet { row, col, value } in iter {
            matrix.insert(row, col, value);
        }
        matrix
    }
}

impl FromIterator<(Index, Index, Value)> for SparseMatrix {
    fn from_iter<I: IntoIterator<Item = (Index, Index, Value)>>(iter: I) -> Self {
        iter.into_iter().map(Triplet::from).collect()
    }
}

/// Declared size of a matrix document, as read from its `rows=` / `cols=` header.
///
/// Informational only: arithmetic never checks coordinates against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixDimensions {
    pub rows: i64,
    pub cols: i64,
}

impl MatrixDimensions {
    pub fn new(rows: i64, cols: i64) -> Self {
        Self { rows, cols }
    }
}

impl fmt::Display for MatrixDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
