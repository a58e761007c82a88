// Arithmetic over SparseMatrix values.
// All three operations borrow their inputs and build a fresh result. They never
// look at declared dimensions, and they keep any zero sums they compute.
// An entry whose exact value leaves the i64 range is saturated and reported as
// an Overflow next to the result.

use std::{collections::BTreeSet, fmt, ops, str::FromStr};

use crate::sparse_matrix::{Index, SparseMatrix, Value};

/// An entry whose exact value does not fit in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow {
    pub row: Index,
    pub col: Index,
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arithmetic overflow at ({}, {}), value saturated",
            self.row, self.col
        )
    }
}

/// The outcome of one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Computation {
    pub matrix: SparseMatrix,
    /// Entries whose stored value is saturated rather than exact, in ascending order.
    pub overflows: Vec<Overflow>,
}

impl Computation {
    pub fn into_matrix(self) -> SparseMatrix {
        self.matrix
    }

    pub fn is_exact(&self) -> bool {
        self.overflows.is_empty()
    }
}

/// Computes `a + b` over the union of stored entries.
pub fn add(a: &SparseMatrix, b: &SparseMatrix) -> SparseMatrix {
    add_checked(a, b).into_matrix()
}

/// Like [`add`], but also returns the entries that overflowed.
pub fn add_checked(a: &SparseMatrix, b: &SparseMatrix) -> Computation {
    combine(a, b, Value::checked_add, Value::saturating_add)
}

/// Computes `a - b` over the union of stored entries.
///
/// Entries that cancel out are stored as explicit zeros.
pub fn subtract(a: &SparseMatrix, b: &SparseMatrix) -> SparseMatrix {
    subtract_checked(a, b).into_matrix()
}

/// Like [`subtract`], but also returns the entries that overflowed.
pub fn subtract_checked(a: &SparseMatrix, b: &SparseMatrix) -> Computation {
    combine(a, b, Value::checked_sub, Value::saturating_sub)
}

/// Computes the product `a * b`.
///
/// Each stored `a[r][k]` is paired with every stored entry of row `k` of `b`, so
/// the work done is proportional to the number of matching pairs. Rows of `a`
/// that find no partner do not appear in the result.
pub fn multiply(a: &SparseMatrix, b: &SparseMatrix) -> SparseMatrix {
    multiply_checked(a, b).into_matrix()
}

/// Like [`multiply`], but also returns the entries that overflowed.
///
/// Once an entry overflows, later terms keep accumulating onto the saturated value.
pub fn multiply_checked(a: &SparseMatrix, b: &SparseMatrix) -> Computation {
    let mut result = SparseMatrix::new();
    let mut overflows = OverflowSet::default();
    for (&row, a_cols) in a.rows() {
        for (&k, &a_val) in a_cols {
            let Some(b_cols) = b.row(k) else {
                continue;
            };
            for (&col, &b_val) in b_cols {
                let acc = result.value_at(row, col);
                let exact = a_val.checked_mul(b_val).and_then(|p| acc.checked_add(p));
                let value = overflows.check(row, col, exact, || {
                    acc.saturating_add(a_val.saturating_mul(b_val))
                });
                result.insert(row, col, value);
            }
        }
    }
    log::trace!(
        "multiply: {} x {} entries -> {} entries",
        a.nnz(),
        b.nnz(),
        result.nnz()
    );
    overflows.finish(result)
}

/// Shared union walk for add and subtract.
///
/// Entries of `a` are combined with the matching value of `b` (zero if absent).
/// Entries found only in `b` are combined as `0 op b`.
fn combine(
    a: &SparseMatrix,
    b: &SparseMatrix,
    checked: fn(Value, Value) -> Option<Value>,
    saturating: fn(Value, Value) -> Value,
) -> Computation {
    let mut result = SparseMatrix::new();
    let mut overflows = OverflowSet::default();
    for t in a {
        let rhs = b.value_at(t.row, t.col);
        let value = overflows.check(t.row, t.col, checked(t.value, rhs), || {
            saturating(t.value, rhs)
        });
        result.insert(t.row, t.col, value);
    }
    for t in b {
        if a.get(t.row, t.col).is_none() {
            let value = overflows.check(t.row, t.col, checked(0, t.value), || {
                saturating(0, t.value)
            });
            result.insert(t.row, t.col, value);
        }
    }
    overflows.finish(result)
}

#[derive(Default)]
struct OverflowSet(BTreeSet<(Index, Index)>);

impl OverflowSet {
    fn check(
        &mut self,
        row: Index,
        col: Index,
        exact: Option<Value>,
        saturated: impl FnOnce() -> Value,
    ) -> Value {
        exact.unwrap_or_else(|| {
            self.0.insert((row, col));
            saturated()
        })
    }

    fn finish(self, matrix: SparseMatrix) -> Computation {
        let overflows: Vec<Overflow> = self
            .0
            .into_iter()
            .map(|(row, col)| Overflow { row, col })
            .collect();
        for overflow in &overflows {
            log::warn!("{}", overflow);
        }
        Computation { matrix, overflows }
    }
}

/// The binary operations offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    pub fn apply(&self, a: &SparseMatrix, b: &SparseMatrix) -> SparseMatrix {
        self.compute(a, b).into_matrix()
    }

    /// Runs the operation and keeps its overflow report.
    pub fn compute(&self, a: &SparseMatrix, b: &SparseMatrix) -> Computation {
        log::debug!("Applying {} to {} and {} entries", self, a.nnz(), b.nnz());
        match self {
            Operation::Add => add_checked(a, b),
            Operation::Subtract => subtract_checked(a, b),
            Operation::Multiply => multiply_checked(a, b),
        }
    }

    /// Section title used when reporting a result.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Add => "Addition Result",
            Operation::Subtract => "Subtraction Result",
            Operation::Multiply => "Multiplication Result",
        }
    }

    /// Menu line describing the operation.
    pub fn menu_text(&self) -> &'static str {
        match self {
            Operation::Add => "Add matrix 1 and matrix 2",
            Operation::Subtract => "Subtract matrix 2 from matrix 1",
            Operation::Multiply => "Multiply matrix 1 by matrix 2",
        }
    }

    /// Menu number, matching what `FromStr` accepts.
    pub fn menu_number(&self) -> u8 {
        match self {
            Operation::Add => 1,
            Operation::Subtract => 2,
            Operation::Multiply => 3,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown operation {:?}, expected add, subtract or multiply",
            self.0
        )
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "add" => Ok(Operation::Add),
            "2" | "sub" | "subtract" => Ok(Operation::Subtract),
            "3" | "mul" | "multiply" => Ok(Operation::Multiply),
            _ => Err(UnknownOperation(s.to_string())),
        }
    }
}

// --- Operator overloads ---

impl ops::Add for &SparseMatrix {
    type Output = SparseMatrix;

    fn add(self, rhs: Self) -> SparseMatrix {
        add(self, rhs)
    }
}

impl ops::Sub for &SparseMatrix {
    type Output = SparseMatrix;

    fn sub(self, rhs: Self) -> SparseMatrix {
        subtract(self, rhs)
    }
}

impl ops::Mul for &SparseMatrix {
    type Output = SparseMatrix;

    fn mul(self, rhs: Self) -> SparseMatrix {
        multiply(self, rhs)
    }
}

impl ops::Neg for &SparseMatrix {
    type Output = SparseMatrix;

    fn neg(self) -> SparseMatrix {
        self.negated()
    }
}
