//! Paragraph view derived from a fragment range.

use serde::{Deserialize, Serialize};

/// A run of equal-sized fragments read from a starting index.
///
/// Computed on demand by [`PdfAnalyzer::paragraph`]; nothing is stored
/// back on the fragment sequence.
///
/// [`PdfAnalyzer::paragraph`]: crate::PdfAnalyzer::paragraph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Concatenated texts of the fragments in the run.
    pub text: String,
    /// Index of the first fragment whose font size differs from the
    /// starting fragment, or `None` if the range ended first.
    pub break_index: Option<usize>,
}

impl Paragraph {
    /// Create a paragraph.
    pub fn new(text: impl Into<String>, break_index: Option<usize>) -> Self {
        Self {
            text: text.into(),
            break_index,
        }
    }

    /// Whether the run reached the end of the range without a size change.
    pub fn is_unbroken(&self) -> bool {
        self.break_index.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_sentinel() {
        let broken = Paragraph::new("Heading", Some(3));
        assert!(!broken.is_unbroken());

        let unbroken = Paragraph::new("Body text", None);
        assert!(unbroken.is_unbroken());
    }
}
