use std::fmt::{self, Write};

use crate::sparse_matrix::{MatrixDimensions, SparseMatrix};

/// Writes one `<row> <col> <value>` line per stored entry.
pub fn write_matrix<W: Write>(out: &mut W, matrix: &SparseMatrix) -> fmt::Result {
    for t in matrix {
        writeln!(out, "{} {} {}", t.row, t.col, t.value)?;
    }
    Ok(())
}

/// Serializes the stored entries, without a dimension header.
///
/// An empty matrix gives an empty string.
pub fn format(matrix: &SparseMatrix) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_matrix(&mut out, matrix);
    out
}

/// Serializes a complete document (header included) that `parse` reads back.
pub fn format_with_header(matrix: &SparseMatrix, dims: MatrixDimensions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "rows={}", dims.rows);
    let _ = writeln!(out, "cols={}", dims.cols);
    let _ = write_matrix(&mut out, matrix);
    out
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_matrix(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_format_empty() {
        assert_eq!(format(&SparseMatrix::new()), "");
    }

    #[test]
    fn test_format_lines() {
        let matrix: SparseMatrix = [(1, 1, 0), (0, 0, 10), (-2, 3, -4)].into_iter().collect();
        assert_eq!(format(&matrix), "-2 3 -4\n0 0 10\n1 1 0\n");
        assert_eq!(matrix.to_string(), format(&matrix));
    }

    #[test]
    fn test_format_with_header_parses_back() {
        let matrix: SparseMatrix = [(0, 0, 5), (1, 1, 0)].into_iter().collect();
        let text = format_with_header(&matrix, MatrixDimensions::new(2, 2));
        assert_eq!(text, "rows=2\ncols=2\n0 0 5\n1 1 0\n");

        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.matrix, matrix);
        assert_eq!(parsed.dims, MatrixDimensions::new(2, 2));
    }
}
