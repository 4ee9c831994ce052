//! All error types for the locgen crate.
//!
//! Every fallible operation of the library (opening a workbook, decoding the
//! mapping file, resolving columns, writing output) returns [`Error`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("workbook contains no worksheets")]
    EmptyWorkbook,

    #[error("worksheet not found: {}", .0.join(", "))]
    WorksheetNotFound(Vec<String>),

    #[error("worksheet `{0}` has no rows")]
    EmptyWorksheetData(String),

    #[error("incomplete mapping file: {0}")]
    ConfigIncomplete(String),

    #[error("can't find column(s) {} in worksheet `{sheet}`", quoted(.names))]
    ColumnNotFound { sheet: String, names: Vec<String> },

    #[error("malformed workbook: {0}")]
    MalformedInput(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("can't decode mapping file: {0}")]
    ConfigDecode(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a malformed input error for the given archive part.
    pub fn malformed(part: impl AsRef<str>, message: impl std::fmt::Display) -> Self {
        Error::MalformedInput(format!("{}: {}", part.as_ref(), message))
    }

    /// Returns `true` when the workbook bytes themselves could not be decoded.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::MalformedInput(_) | Error::XmlParse(_))
    }
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("`{}`", n))
        .collect::<Vec<_>>()
        .join(", ")
}
