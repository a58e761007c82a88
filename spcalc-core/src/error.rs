use std::{fmt, num::ParseIntError, path::PathBuf};

use thiserror::Error;

pub type Result<T> = core::result::Result<T, SpcalcError>;

/// Which of the two header lines a [`FormatError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Rows,
    Cols,
}

impl HeaderField {
    /// The literal prefix the header line must start with.
    pub fn prefix(&self) -> &'static str {
        match self {
            HeaderField::Rows => "rows=",
            HeaderField::Cols => "cols=",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::Rows => f.write_str("rows"),
            HeaderField::Cols => f.write_str("cols"),
        }
    }
}

/// Fatal problems with the content of a matrix document. Parsing stops at the first one.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Invalid format for {field}: expected `{}<integer>`, found {found:?}", .field.prefix())]
    MissingHeader { field: HeaderField, found: String },

    #[error("Invalid value for {field}: {value:?} is not an integer")]
    InvalidHeaderValue {
        field: HeaderField,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Content could not be read: {0}")]
    Unreadable(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SpcalcError {
    #[error("File {} not found or not readable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred while reading the file {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Content(#[from] FormatError),
}

impl SpcalcError {
    /// The underlying [`FormatError`], if this is a content problem.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            SpcalcError::Format { source, .. } | SpcalcError::Content(source) => Some(source),
            SpcalcError::SourceUnavailable { .. } => None,
        }
    }
}

#[cfg(feature = "wasm")]
impl From<SpcalcError> for wasm_bindgen::JsValue {
    fn from(err: SpcalcError) -> Self {
        Self::from_str(&err.to_string())
    }
}
