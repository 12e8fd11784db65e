//! Data model for fragment analysis.
//!
//! This module defines the raw extractor geometry (pages, blocks, lines)
//! and the analysis types built over it (spans, fragments, paragraphs).
//! All types are backend-agnostic and serde-serializable.

mod fragment;
mod paragraph;
mod raw;
mod span;

pub use fragment::{Fragment, FragmentText};
pub use paragraph::Paragraph;
pub use raw::{RawBlock, RawLine, RawPage, RawSpan};
pub use span::Span;
