//! # pdfrag
//!
//! Fragment-level text analysis for PDF documents.
//!
//! This library reads a PDF (or extractor JSON) and rebuilds its text
//! as fragments: maximal runs of consecutive spans sharing font size,
//! font family and fill color. The fragment list answers layout
//! questions raw extraction cannot, such as where a paragraph ends or
//! what a line-wrapped hyperlink's full URL is.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfrag::analyze_file;
//!
//! fn main() -> pdfrag::Result<()> {
//!     let mut analyzer = analyze_file("document.pdf")?;
//!
//!     // Undo line-wrap splits in rendered URLs
//!     analyzer.merge_hyperlinks(0, None);
//!
//!     for fragment in analyzer.fragments(0, None) {
//!         println!("[{}] {:.1}pt {}", fragment.index, fragment.font_size, fragment.plain_text());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Span grouping**: metadata-equal runs become stable, indexed fragments
//! - **Paragraph detection**: font size changes mark paragraph breaks
//! - **Hyperlink merging**: wrapped URLs rejoined from their split spans
//! - **Text location**: exact-match lookup of a span's fragment position
//! - **Pluggable input**: bundled lopdf backend, extractor JSON, or raw spans

pub mod analyzer;
pub mod error;
pub mod extract;
pub mod model;

pub use analyzer::{PdfAnalyzer, HYPERLINK_COLOR};
pub use error::{Error, Result};
pub use extract::{flatten_spans, LopdfBackend, PdfBackend};
pub use model::{
    Fragment, FragmentText, Paragraph, RawBlock, RawLine, RawPage, RawSpan, Span,
};

use std::io::Read;
use std::path::Path;

/// Analyze a PDF file and return its fragment list.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
///
/// # Returns
///
/// A `Result` containing the [`PdfAnalyzer`] or an error.
///
/// # Example
///
/// ```no_run
/// use pdfrag::analyze_file;
///
/// let analyzer = analyze_file("document.pdf").unwrap();
/// println!("Fragments: {}", analyzer.fragment_count());
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<PdfAnalyzer> {
    PdfAnalyzer::open(path)
}

/// Analyze a PDF from bytes.
///
/// # Arguments
///
/// * `data` - PDF file content as bytes
///
/// # Example
///
/// ```no_run
/// use pdfrag::analyze_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let analyzer = analyze_bytes(&data).unwrap();
/// ```
pub fn analyze_bytes(data: &[u8]) -> Result<PdfAnalyzer> {
    PdfAnalyzer::from_bytes(data)
}

/// Analyze a PDF from a reader.
///
/// # Arguments
///
/// * `reader` - Any type implementing `Read`
///
/// # Example
///
/// ```no_run
/// use pdfrag::analyze_reader;
/// use std::fs::File;
///
/// let file = File::open("document.pdf").unwrap();
/// let analyzer = analyze_reader(file).unwrap();
/// ```
pub fn analyze_reader<R: Read>(reader: R) -> Result<PdfAnalyzer> {
    PdfAnalyzer::from_reader(reader)
}
