use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while validating input and planning page layouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Page range text does not match the grammar
    #[error("Invalid range format '{expression}': {reason}")]
    InvalidFormat { expression: String, reason: String },

    /// A valid page index past the end of the document
    #[error("Page {page} exceeds the number of pages in the PDF file ({total})")]
    PageOutOfRange { page: u32, total: u32 },

    #[error("Unsupported split mode: {0}")]
    UnsupportedMode(String),

    #[error("At least 2 input files are required for merging (got {0})")]
    NotEnoughInputs(usize),

    #[error("File does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("File is not a PDF file: {}", path.display())]
    NotAPdf { path: PathBuf },

    #[error("Invalid output file name: {name}")]
    InvalidOutputName { name: String },

    /// The page count of a merge input could not be read
    #[error("Failed to read {}: {reason}", path.display())]
    Document { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn format(expression: &str, reason: impl Into<String>) -> Self {
        Error::InvalidFormat {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}
