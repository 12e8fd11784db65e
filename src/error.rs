//! Error types for the pdfrag library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfrag operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during fragment analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error deserializing pre-extracted page data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document contains no text spans.
    #[error("Document contains no text spans")]
    EmptyDocument,

    /// Fragment index is out of range.
    #[error("Fragment {0} is out of range (document has {1} fragments)")]
    FragmentOutOfRange(usize, usize),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
