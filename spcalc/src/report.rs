use serde::{Serialize, Serializer};
use spcalc_core::{format::write_matrix, SparseMatrix};

/// A titled matrix within a [`Report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(rename = "entries", serialize_with = "serialize_entries")]
    pub matrix: SparseMatrix,
}

fn serialize_entries<S: Serializer>(matrix: &SparseMatrix, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(matrix.iter())
}

/// The output document: both inputs followed by every computed result, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, title: impl Into<String>, matrix: SparseMatrix) {
        self.sections.push(Section {
            title: title.into(),
            matrix,
        });
    }

    /// Results only, skipping the two input sections.
    pub fn results(&self) -> &[Section] {
        self.sections.get(2..).unwrap_or_default()
    }

    /// Renders each section as `<title>:` followed by its entry lines, with a blank
    /// line between sections.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&section.title);
            out.push_str(":\n");
            // Writing into a String cannot fail
            let _ = write_matrix(&mut out, &section.matrix);
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
