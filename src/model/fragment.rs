//! Fragments: maximal runs of metadata-equal spans.

use serde::{Deserialize, Serialize};

use crate::model::Span;

/// Text carried by a fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FragmentText {
    /// Derive the text from the member spans on demand.
    Joined,
    /// Fixed override text set by hyperlink merging.
    Merged(String),
}

/// A maximal run of consecutive spans sharing font size, family, and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Position of this fragment in document order.
    pub index: usize,
    /// Member spans, in reading order. Never empty.
    pub spans: Vec<Span>,
    /// Font size shared by every member span.
    pub font_size: f32,
    /// Font family shared by every member span.
    pub font_family: String,
    /// Packed 0xRRGGBB color shared by every member span.
    pub color: u32,
    /// Effective text of the fragment.
    pub text: FragmentText,
}

impl Fragment {
    /// Create a fragment from a run of spans.
    ///
    /// Callers guarantee the run is non-empty and metadata-uniform; the
    /// fragment metadata is taken from the first span.
    pub(crate) fn from_run(index: usize, spans: Vec<Span>) -> Self {
        let first = &spans[0];
        Self {
            index,
            font_size: first.font_size,
            font_family: first.font_family.clone(),
            color: first.color,
            spans,
            text: FragmentText::Joined,
        }
    }

    /// Join the text of the member spans with the given separator.
    ///
    /// Ignores any merged override; see [`Fragment::plain_text`] for the
    /// override-aware accessor.
    pub fn join_spans(&self, separator: &str) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Effective text: the merged override if present, otherwise the
    /// member spans joined with a single space.
    pub fn plain_text(&self) -> String {
        match &self.text {
            FragmentText::Merged(text) => text.clone(),
            FragmentText::Joined => self.join_spans(" "),
        }
    }

    /// Whether hyperlink merging replaced this fragment's text.
    pub fn is_merged(&self) -> bool {
        matches!(self.text, FragmentText::Merged(_))
    }

    /// Number of member spans.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }
}
