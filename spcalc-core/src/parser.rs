//! Reading matrix documents.
//!
//! A document is two header lines (`rows=<n>`, `cols=<n>`) followed by one
//! `<row> <col> <value>` entry per line. Header problems are fatal. Problems with
//! a single entry line are reported as [`ParseWarning`]s and the line is skipped.

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use crate::{
    error::{FormatError, HeaderField, Result, SpcalcError},
    sparse_matrix::{Index, MatrixDimensions, SparseMatrix, Value},
};

/// The outcome of parsing one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMatrix {
    /// Declared size from the header. Not checked against the entries.
    pub dims: MatrixDimensions,
    pub matrix: SparseMatrix,
    /// Entry lines that were skipped, in document order.
    pub warnings: Vec<ParseWarning>,
}

impl ParsedMatrix {
    pub fn into_matrix(self) -> SparseMatrix {
        self.matrix
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// The line did not hold exactly three numeric tokens.
    TokenCount(usize),
    /// Three tokens were found but this one is not a valid integer.
    InvalidNumber(String),
}

/// A skipped entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number within the document.
    pub line_number: usize,
    /// The offending line, trimmed.
    pub line: String,
    pub kind: WarningKind,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::TokenCount(_) => {
                write!(f, "Invalid line format: {} (line {})", self.line, self.line_number)
            }
            WarningKind::InvalidNumber(_) => write!(
                f,
                "Invalid number format in line: {} (line {})",
                self.line, self.line_number
            ),
        }
    }
}

/// Splits a line into its numeric tokens.
///
/// A token is a maximal run of ASCII digits and `-`; every other character is a
/// separator. Tokens are not validated, so `--5` or `3-4` come back as-is.
pub fn extract_numbers(line: &str) -> Vec<&str> {
    line.split(|c: char| !(c.is_ascii_digit() || c == '-'))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Splits text into lines ended by `\n`, `\r\n` or a lone `\r`.
///
/// A final line terminator does not produce an empty last line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let remaining = rest?;
        match remaining.find(['\r', '\n']) {
            Some(end) => {
                let terminator = if remaining[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&remaining[end + terminator..]);
                Some(&remaining[..end])
            }
            None => {
                rest = None;
                (!remaining.is_empty()).then_some(remaining)
            }
        }
    })
}

/// Parses a whole matrix document.
pub fn parse(text: &str) -> core::result::Result<ParsedMatrix, FormatError> {
    let mut lines = split_lines(text);
    let rows = parse_header(lines.next(), HeaderField::Rows)?;
    let cols = parse_header(lines.next(), HeaderField::Cols)?;
    let dims = MatrixDimensions::new(rows, cols);
    log::debug!("Parsed header, declared dimensions {}", dims);

    let mut matrix = SparseMatrix::new();
    let mut warnings = Vec::new();
    // Entry lines start after the two header lines
    for (line_number, raw) in (3..).zip(lines) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_entry(line) {
            Ok((row, col, value)) => {
                if let Some(previous) = matrix.insert(row, col, value) {
                    log::debug!(
                        "Entry ({}, {}) redefined on line {}: {} -> {}",
                        row,
                        col,
                        line_number,
                        previous,
                        value
                    );
                }
            }
            Err(kind) => {
                let warning = ParseWarning {
                    line_number,
                    line: line.to_string(),
                    kind,
                };
                log::warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    log::debug!(
        "Parsed {} entries across {} rows ({} lines skipped)",
        matrix.nnz(),
        matrix.row_count(),
        warnings.len()
    );
    Ok(ParsedMatrix {
        dims,
        matrix,
        warnings,
    })
}

/// Reads the whole source, then parses it.
pub fn parse_reader<R: BufRead>(mut reader: R) -> core::result::Result<ParsedMatrix, FormatError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(FormatError::Unreadable)?;
    parse(&text)
}

/// Reads and parses the matrix file at `path`.
///
/// A file that cannot be opened is [`SpcalcError::SourceUnavailable`]; anything
/// that goes wrong afterwards is [`SpcalcError::Format`].
pub fn read_matrix(path: impl AsRef<Path>) -> Result<ParsedMatrix> {
    let path = path.as_ref();
    log::debug!("Reading matrix from {}", path.display());
    let file = File::open(path).map_err(|source| SpcalcError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_reader(BufReader::new(file)).map_err(|source| SpcalcError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// The value is the text after the prefix up to the next `=`, if any.
fn parse_header(line: Option<&str>, field: HeaderField) -> core::result::Result<i64, FormatError> {
    let line = line.unwrap_or_default().trim();
    let rest = line
        .strip_prefix(field.prefix())
        .ok_or_else(|| FormatError::MissingHeader {
            field,
            found: line.to_string(),
        })?;
    let value = rest.split_once('=').map_or(rest, |(value, _)| value).trim();
    value
        .parse()
        .map_err(|source| FormatError::InvalidHeaderValue {
            field,
            value: value.to_string(),
            source,
        })
}

fn parse_entry(line: &str) -> core::result::Result<(Index, Index, Value), WarningKind> {
    let tokens = extract_numbers(line);
    let [row, col, value] = tokens.as_slice() else {
        return Err(WarningKind::TokenCount(tokens.len()));
    };
    let number = |token: &str| {
        token
            .parse::<i64>()
            .map_err(|_| WarningKind::InvalidNumber(token.to_string()))
    };
    Ok((number(row)?, number(col)?, number(value)?))
}

/// Parses a document and keeps only the matrix. Skipped lines are still logged.
impl FromStr for SparseMatrix {
    type Err = FormatError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        parse(s).map(ParsedMatrix::into_matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_extract_numbers_character_classes() {
        assert_eq!(extract_numbers("0 0 5"), vec!["0", "0", "5"]);
        assert_eq!(extract_numbers("(1, 2) = -7"), vec!["1", "2", "-7"]);
        assert_eq!(extract_numbers("1.5 2 3"), vec!["1", "5", "2", "3"]);
        assert_eq!(extract_numbers("3-4 x --5"), vec!["3-4", "--5"]);
        assert_eq!(extract_numbers("abc"), Vec::<&str>::new());
        assert_eq!(extract_numbers("12"), vec!["12"]);
    }

    #[test]
    fn test_parse_simple_document() {
        let parsed = parse("rows=2\ncols=2\n0 0 5\n1 1 3\n").unwrap();
        assert_eq!(parsed.dims, MatrixDimensions::new(2, 2));
        assert!(parsed.warnings.is_empty());
        let expected: SparseMatrix = [(0, 0, 5), (1, 1, 3)].into_iter().collect();
        assert_eq!(parsed.matrix, expected);
    }

    #[test]
    fn test_parse_tolerates_separators_and_blank_lines() {
        let text = "  rows=3 \r\ncols= 3\r\n\r\n[0, 1] = 4\r\n   \n2;2;-1\n";
        let parsed = parse(text).unwrap();
        assert_eq!(parsed.dims, MatrixDimensions::new(3, 3));
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.matrix.get(0, 1), Some(4));
        assert_eq!(parsed.matrix.get(2, 2), Some(-1));
        assert_eq!(parsed.matrix.nnz(), 2);
    }

    #[test]
    fn test_split_lines_terminators() {
        let lines: Vec<&str> = split_lines("a\r\nb\rc\n\nd\r").collect();
        assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("x").collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_parse_carriage_return_line_endings() {
        let parsed = parse("rows=2\rcols=2\r0 0 5\rabc\r1 1 3\r").unwrap();
        assert_eq!(parsed.dims, MatrixDimensions::new(2, 2));
        let expected: SparseMatrix = [(0, 0, 5), (1, 1, 3)].into_iter().collect();
        assert_eq!(parsed.matrix, expected);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line_number, 4);
    }

    #[test]
    fn test_parse_header_value_ends_at_next_equals() {
        let parsed = parse("rows=3=4\ncols= 2 =x\n").unwrap();
        assert_eq!(parsed.dims, MatrixDimensions::new(3, 2));

        let err = parse("rows==3\ncols=2\n").unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidHeaderValue { ref value, .. } if value.is_empty()
        ));
    }

    #[test]
    fn test_parse_skips_line_without_tokens() {
        let parsed = parse("rows=2\ncols=2\n0 0 5\nabc\n1 1 3\n").unwrap();
        assert_eq!(parsed.matrix.nnz(), 2);
        assert_eq!(parsed.warnings.len(), 1);
        let warning = &parsed.warnings[0];
        assert_eq!(warning.line_number, 4);
        assert_eq!(warning.line, "abc");
        assert_eq!(warning.kind, WarningKind::TokenCount(0));
        assert!(warning.to_string().starts_with("Invalid line format: abc"));
    }

    #[test]
    fn test_parse_skips_wrong_token_count() {
        let parsed = parse("rows=2\ncols=2\n1 2\n1 2 3 4\n1.5 1 1\n").unwrap();
        assert!(parsed.matrix.is_empty());
        let kinds: Vec<&WarningKind> = parsed.warnings.iter().map(|w| &w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &WarningKind::TokenCount(2),
                &WarningKind::TokenCount(4),
                &WarningKind::TokenCount(4)
            ]
        );
    }

    #[test]
    fn test_parse_skips_invalid_numbers() {
        let parsed = parse("rows=2\ncols=2\n0 --1 5\n0 0 99999999999999999999\n1 1 1\n").unwrap();
        assert_eq!(parsed.matrix.nnz(), 1);
        assert_eq!(parsed.warnings.len(), 2);
        assert_eq!(
            parsed.warnings[0].kind,
            WarningKind::InvalidNumber("--1".to_string())
        );
        assert!(parsed.warnings[1]
            .to_string()
            .starts_with("Invalid number format in line:"));
    }

    #[test]
    fn test_parse_last_write_wins() {
        let parsed = parse("rows=1\ncols=1\n0 0 1\n0 0 2\n").unwrap();
        assert_eq!(parsed.matrix.get(0, 0), Some(2));
        assert_eq!(parsed.matrix.nnz(), 1);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_parse_keeps_negative_indices_and_zero_values() {
        let parsed = parse("rows=1\ncols=1\n-1 -2 0\n").unwrap();
        assert_eq!(parsed.matrix.get(-1, -2), Some(0));
    }

    #[test]
    fn test_parse_invalid_rows_header_value() {
        let err = parse("rows=two\ncols=2\nabc\n").unwrap_err();
        match err {
            FormatError::InvalidHeaderValue { field, value, .. } => {
                assert_eq!(field, HeaderField::Rows);
                assert_eq!(value, "two");
            }
            other => panic!("Expected InvalidHeaderValue error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_cols_header() {
        let err = parse("rows=2\n0 0 5\n").unwrap_err();
        match err {
            FormatError::MissingHeader { field, found } => {
                assert_eq!(field, HeaderField::Cols);
                assert_eq!(found, "0 0 5");
            }
            other => panic!("Expected MissingHeader error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(matches!(
            parse(""),
            Err(FormatError::MissingHeader {
                field: HeaderField::Rows,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_headers_only() {
        let parsed = parse("rows=0\ncols=0").unwrap();
        assert!(parsed.matrix.is_empty());
        assert_eq!(parsed.dims, MatrixDimensions::new(0, 0));
    }

    #[test]
    fn test_parse_reader_rejects_invalid_utf8() {
        let bytes: Vec<u8> = b"rows=1\ncols=1\n0 0 \xff\n".to_vec();
        let err = parse_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, FormatError::Unreadable(_)));
    }

    #[test]
    fn test_from_str() {
        let matrix: SparseMatrix = "rows=1\ncols=2\n0 1 9\n".parse().unwrap();
        assert_eq!(matrix.get(0, 1), Some(9));
    }
}
