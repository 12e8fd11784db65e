//! Flattening of extractor page geometry into analyzer spans.

use crate::model::{RawPage, Span};

/// Flatten page geometry into a single span list in reading order.
///
/// Pages are walked in order, blocks within a page in order, lines
/// within a block in order. Image blocks carry no lines and contribute
/// nothing.
///
/// # Arguments
///
/// * `pages` - Raw pages produced by a backend or deserialized from JSON
///
/// # Example
///
/// ```
/// use pdfrag::extract::flatten_spans;
/// use pdfrag::model::{RawBlock, RawLine, RawPage, RawSpan};
///
/// let page = RawPage::new(vec![
///     RawBlock::image(),
///     RawBlock::text(vec![RawLine::new(vec![RawSpan::new(
///         12.0, "Helvetica", 0, "Hello",
///     )])]),
/// ]);
///
/// let spans = flatten_spans(&[page]);
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].text, "Hello");
/// ```
pub fn flatten_spans(pages: &[RawPage]) -> Vec<Span> {
    let mut spans = Vec::new();
    for page in pages {
        for block in &page.blocks {
            // Image blocks have no lines entry
            if let Some(lines) = &block.lines {
                for line in lines {
                    for raw in &line.spans {
                        spans.push(Span::from(raw.clone()));
                    }
                }
            }
        }
    }
    spans
}
