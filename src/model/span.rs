//! The span atom of fragment analysis.

use serde::{Deserialize, Serialize};

use crate::model::RawSpan;

/// A contiguous run of text with uniform font metadata.
///
/// Spans are never split or rewritten by the analyzer, only grouped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Font size in points.
    pub font_size: f32,
    /// Font family name.
    pub font_family: String,
    /// Text color packed as 0xRRGGBB.
    pub color: u32,
    /// Text content.
    pub text: String,
}

impl Span {
    /// Create a new span.
    pub fn new(
        font_size: f32,
        font_family: impl Into<String>,
        color: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            font_size,
            font_family: font_family.into(),
            color,
            text: text.into(),
        }
    }

    /// Check whether two spans agree on font size, family, and color.
    ///
    /// Text content is excluded from the comparison; metadata alone
    /// decides fragment membership.
    pub fn metadata_eq(&self, other: &Span) -> bool {
        self.font_size == other.font_size
            && self.font_family == other.font_family
            && self.color == other.color
    }
}

impl From<RawSpan> for Span {
    fn from(raw: RawSpan) -> Self {
        Self {
            font_size: raw.size,
            font_family: raw.font,
            color: raw.color,
            text: raw.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_eq_ignores_text() {
        let a = Span::new(12.0, "Arial", 0, "Hello");
        let b = Span::new(12.0, "Arial", 0, "World");
        assert!(a.metadata_eq(&b));
    }

    #[test]
    fn test_metadata_eq_checks_all_fields() {
        let base = Span::new(12.0, "Arial", 0, "x");

        assert!(!base.metadata_eq(&Span::new(12.5, "Arial", 0, "x")));
        assert!(!base.metadata_eq(&Span::new(12.0, "Arial-Bold", 0, "x")));
        assert!(!base.metadata_eq(&Span::new(12.0, "Arial", 0xFF0000, "x")));
    }

    #[test]
    fn test_from_raw_span() {
        let raw = RawSpan::new(10.5, "Courier", 0x0000FF, "mono");
        let span = Span::from(raw);
        assert_eq!(span.font_size, 10.5);
        assert_eq!(span.font_family, "Courier");
        assert_eq!(span.color, 0x0000FF);
        assert_eq!(span.text, "mono");
    }
}
