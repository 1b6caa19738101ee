use serde::{Deserialize, Serialize};

/// Minimum number of fields a row needs to carry X, Y and Z
pub const MIN_COORDINATE_FIELDS: usize = 3;

/// One data row of a tab-delimited coordinate file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateRecord {
    /// 1-based line number in the source file
    pub line: usize,

    /// Raw fields, split on tab
    pub fields: Vec<String>,
}

impl CoordinateRecord {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Split a trimmed data line on tab
    #[must_use]
    pub fn from_line(line: usize, text: &str) -> Self {
        Self::new(line, text.split('\t').map(str::to_string).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if the row has enough fields to hold a coordinate triple
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.fields.len() >= MIN_COORDINATE_FIELDS
    }

    #[must_use]
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Fields rejoined with tab, as written to the output file
    #[must_use]
    pub fn to_tsv_line(&self) -> String {
        self.fields.join("\t")
    }
}
