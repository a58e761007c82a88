//! # spcalc core library
//!
//! Sparse integer matrices: parsing the `rows=`/`cols=` text format, addition,
//! subtraction and multiplication, and formatting results back to text.

// Declare modules
pub mod error;
pub mod format;
pub mod ops;
pub mod parser;
pub mod sparse_matrix;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public types
pub use error::{FormatError, SpcalcError};
pub use format::{format, format_with_header};
pub use ops::{add, multiply, subtract, Computation, Operation, Overflow};
pub use parser::{parse, read_matrix, ParseWarning, ParsedMatrix};
pub use sparse_matrix::{MatrixDimensions, SparseMatrix, Triplet};
