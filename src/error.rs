//! Error types for the rollsheet library.

use std::io;
use thiserror::Error;

/// Result type alias for rollsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a workbook or aggregating its rows.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive is missing an expected part, or a part is not valid XML
    /// of the expected shape.
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// A shared-string reference that does not point into the table.
    #[error("Corrupt shared-string reference {reference:?} ({available} strings available)")]
    CorruptReference { reference: String, available: usize },

    /// A configured column name is absent from the header row.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A non-empty cell in a numeric column that is not a number.
    #[error("Invalid number in column {column}: {value:?}")]
    InvalidNumber { column: String, value: String },

    /// A logical sheet name that the sheet map does not know about.
    #[error("Unknown sheet: {0}")]
    UnknownSheet(String),

    /// Error while rendering a report.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::MalformedContainer(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedContainer(format!("XML parse error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownColumn("bet_year".to_string());
        assert_eq!(err.to_string(), "Unknown column: bet_year");

        let err = Error::CorruptReference {
            reference: "7".to_string(),
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Corrupt shared-string reference \"7\" (3 strings available)"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_zip() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::MalformedContainer(_)));
    }
}
