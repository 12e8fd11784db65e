//! PDF text extraction.

mod backend;
mod content;
mod spans;

pub use backend::{LopdfBackend, PdfBackend};
pub use spans::flatten_spans;
