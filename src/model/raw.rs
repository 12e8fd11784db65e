//! Raw page geometry as reported by a PDF backend.
//!
//! Mirrors the page → block → line → span nesting that text extractors
//! produce. The field names match the extractor dictionary keys, so
//! pre-extracted JSON deserializes directly; unknown keys are ignored.

use serde::{Deserialize, Serialize};

/// A single styled run of text as reported by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Font size in points.
    pub size: f32,
    /// Font family name (e.g., "Helvetica-Bold").
    pub font: String,
    /// Fill color packed as 0xRRGGBB.
    pub color: u32,
    /// Decoded text content.
    pub text: String,
}

impl RawSpan {
    /// Create a new raw span.
    pub fn new(size: f32, font: impl Into<String>, color: u32, text: impl Into<String>) -> Self {
        Self {
            size,
            font: font.into(),
            color,
            text: text.into(),
        }
    }
}

/// A baseline of spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// Spans on this baseline, in reading order.
    pub spans: Vec<RawSpan>,
}

impl RawLine {
    /// Create a line from spans.
    pub fn new(spans: Vec<RawSpan>) -> Self {
        Self { spans }
    }
}

/// A layout block. Text blocks carry lines; image blocks carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Lines of the block, absent for non-text blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<RawLine>>,
}

impl RawBlock {
    /// Create a text block.
    pub fn text(lines: Vec<RawLine>) -> Self {
        Self { lines: Some(lines) }
    }

    /// Create a block without lines (image or drawing content).
    pub fn image() -> Self {
        Self { lines: None }
    }

    /// Whether this block carries text lines.
    pub fn is_text(&self) -> bool {
        self.lines.is_some()
    }
}

/// A single page of extracted content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Layout blocks in reading order.
    pub blocks: Vec<RawBlock>,
}

impl RawPage {
    /// Create a page from blocks.
    pub fn new(blocks: Vec<RawBlock>) -> Self {
        Self { blocks }
    }
}
