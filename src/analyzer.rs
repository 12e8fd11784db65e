//! Fragment analysis over extracted text spans.
//!
//! [`PdfAnalyzer`] owns the fragment list built from a document's spans
//! and answers the questions the rest of the crate is about: which
//! fragments exist, where a paragraph ends, where a piece of text sits,
//! and which fragments are rendered hyperlinks.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::extract::{flatten_spans, LopdfBackend, PdfBackend};
use crate::model::{Fragment, FragmentText, Paragraph, RawPage, Span};

/// Packed RGB fill color (0x178FFF) that marks rendered hyperlinks.
pub const HYPERLINK_COLOR: u32 = 1_544_191;

/// Matches span text that opens an absolute HTTP(S) URL.
static HYPERLINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("valid hyperlink pattern"));

/// Fragment-level view of a PDF document.
///
/// Spans are grouped in reading order into fragments, the maximal runs
/// of consecutive spans that share font size, font family and color.
/// Fragment indexes are stable for the lifetime of the analyzer and
/// every range-taking method interprets `end: None` as the end of the
/// document.
///
/// # Example
///
/// ```no_run
/// use pdfrag::PdfAnalyzer;
///
/// let mut analyzer = PdfAnalyzer::open("document.pdf").unwrap();
/// analyzer.merge_hyperlinks(0, None);
///
/// for fragment in analyzer.fragments(0, None) {
///     println!("[{}] {}", fragment.index, fragment.plain_text());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PdfAnalyzer {
    fragments: Vec<Fragment>,
}

impl PdfAnalyzer {
    /// Open a PDF file and build its fragment list.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the PDF file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdfrag::PdfAnalyzer;
    ///
    /// let analyzer = PdfAnalyzer::open("document.pdf").unwrap();
    /// println!("{} fragments", analyzer.fragment_count());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = LopdfBackend::load_file(path)?;
        Self::from_backend(&backend)
    }

    /// Build the fragment list from PDF data already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        Self::from_backend(&backend)
    }

    /// Build the fragment list from any reader yielding PDF data.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let backend = LopdfBackend::load_reader(reader)?;
        Self::from_backend(&backend)
    }

    /// Build the fragment list from an already constructed backend.
    pub fn from_backend(backend: &dyn PdfBackend) -> Result<Self> {
        let pages = backend.extract_pages()?;
        Self::from_pages(&pages)
    }

    /// Build the fragment list from raw page geometry.
    pub fn from_pages(pages: &[RawPage]) -> Result<Self> {
        Self::from_spans(flatten_spans(pages))
    }

    /// Build the fragment list from extractor JSON.
    ///
    /// The input is an array of pages in the block/line/span shape that
    /// [`RawPage`] deserializes. Unknown keys are ignored, so output
    /// from richer extractors works unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use pdfrag::PdfAnalyzer;
    ///
    /// let json = r#"[{ "blocks": [{ "lines": [{ "spans": [
    ///     { "size": 12.0, "font": "Arial", "color": 0, "text": "Hello" },
    ///     { "size": 12.0, "font": "Arial", "color": 0, "text": "world" }
    /// ] }] }] }]"#;
    ///
    /// let analyzer = PdfAnalyzer::from_json(json).unwrap();
    /// assert_eq!(analyzer.fragment_count(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let pages: Vec<RawPage> = serde_json::from_str(json)?;
        Self::from_pages(&pages)
    }

    /// Group spans into fragments.
    ///
    /// A fragment ends exactly where the next span differs in font
    /// size, font family or color. Span order is preserved, every span
    /// lands in exactly one fragment, and fragment indexes count up
    /// from zero in reading order.
    pub fn from_spans(spans: Vec<Span>) -> Result<Self> {
        if spans.is_empty() {
            return Err(Error::EmptyDocument);
        }
        let total = spans.len();

        let mut fragments: Vec<Fragment> = Vec::new();
        let mut current_run: Vec<Span> = Vec::new();

        for span in spans {
            if let Some(last) = current_run.last() {
                if !last.metadata_eq(&span) {
                    let index = fragments.len();
                    fragments.push(Fragment::from_run(index, std::mem::take(&mut current_run)));
                }
            }
            current_run.push(span);
        }

        // Don't forget the last run
        let index = fragments.len();
        fragments.push(Fragment::from_run(index, current_run));

        log::debug!("Grouped {} spans into {} fragments", total, fragments.len());

        Ok(Self { fragments })
    }

    /// Number of fragments in the document.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Total number of spans across all fragments.
    pub fn span_count(&self) -> usize {
        self.fragments.iter().map(|f| f.span_count()).sum()
    }

    /// Fragments in `[start, end)`, clamped to the document.
    ///
    /// `end: None` means the end of the document. Ranges that fall
    /// outside the document yield an empty slice rather than an error.
    pub fn fragments(&self, start: usize, end: Option<usize>) -> &[Fragment] {
        let (start, end) = self.clamp_range(start, end);
        &self.fragments[start..end]
    }

    /// Single fragment by index.
    ///
    /// Unlike [`fragments`](Self::fragments) this is strict: an index
    /// past the end is an error, not an empty result.
    pub fn fragment(&self, index: usize) -> Result<&Fragment> {
        self.fragments
            .get(index)
            .ok_or(Error::FragmentOutOfRange(index, self.fragments.len()))
    }

    /// Collapse rendered hyperlinks in `[start, end)` into single texts.
    ///
    /// A fragment is a rendered hyperlink when its color is
    /// [`HYPERLINK_COLOR`] and its first span's text opens an absolute
    /// HTTP(S) URL. Extractors split long URLs across spans at line
    /// wraps, so the override text joins the spans with no separator.
    /// Returns the number of fragments that matched; fragments already
    /// merged match again on a second call.
    ///
    /// # Arguments
    ///
    /// * `start` - First fragment index to consider
    /// * `end` - One past the last index, or `None` for the document end
    pub fn merge_hyperlinks(&mut self, start: usize, end: Option<usize>) -> usize {
        let (start, end) = self.clamp_range(start, end);
        let mut merged = 0;

        for fragment in &mut self.fragments[start..end] {
            if fragment.color != HYPERLINK_COLOR {
                continue;
            }
            let is_link = fragment
                .spans
                .first()
                .is_some_and(|s| HYPERLINK_PATTERN.is_match(&s.text));
            if is_link {
                let text = fragment.join_spans("");
                fragment.text = FragmentText::Merged(text);
                merged += 1;
            }
        }

        if merged > 0 {
            log::debug!("Merged {} hyperlink fragments", merged);
        }
        merged
    }

    /// Paragraph starting at fragment `start`.
    ///
    /// Walks fragments from `start` while they keep the starting font
    /// size and concatenates their texts with no separator, taking the
    /// merged text where [`merge_hyperlinks`](Self::merge_hyperlinks)
    /// has set one. The walk stops at `end` (`None` for the document
    /// end) or at the first font size change, whose fragment index is
    /// reported as the paragraph's `break_index`.
    ///
    /// Errors with [`Error::FragmentOutOfRange`] only when `start`
    /// itself is out of bounds. An `end` at or before `start` leaves
    /// nothing to walk and yields the starting fragment's text alone.
    pub fn paragraph(&self, start: usize, end: Option<usize>) -> Result<Paragraph> {
        let count = self.fragments.len();
        if start >= count {
            return Err(Error::FragmentOutOfRange(start, count));
        }
        let end = end.unwrap_or(count).min(count);

        let first = &self.fragments[start];
        let font_size = first.font_size;
        let mut text = first.plain_text();
        let mut break_index = None;

        for fragment in &self.fragments[(start + 1).min(end)..end] {
            if fragment.font_size != font_size {
                break_index = Some(fragment.index);
                break;
            }
            text.push_str(&fragment.plain_text());
        }

        Ok(Paragraph::new(text, break_index))
    }

    /// Locate a span whose text equals `text` exactly.
    ///
    /// Searches fragments in `[start, end)` in reading order and
    /// returns `(fragment_index, span_index)` for the first exact
    /// match. Comparison is by `==` on the span text, so substrings,
    /// case variants and surrounding whitespace do not match.
    pub fn find_text(&self, text: &str, start: usize, end: Option<usize>) -> Option<(usize, usize)> {
        let (start, end) = self.clamp_range(start, end);
        for fragment in &self.fragments[start..end] {
            for (span_index, span) in fragment.spans.iter().enumerate() {
                if span.text == text {
                    return Some((fragment.index, span_index));
                }
            }
        }
        None
    }

    /// Clamp a half-open range to the fragment list.
    fn clamp_range(&self, start: usize, end: Option<usize>) -> (usize, usize) {
        let count = self.fragments.len();
        let end = end.unwrap_or(count).min(count);
        let start = start.min(end);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(size: f32, font: &str, color: u32, text: &str) -> Span {
        Span::new(size, font, color, text)
    }

    fn analyzer(spans: Vec<Span>) -> PdfAnalyzer {
        PdfAnalyzer::from_spans(spans).unwrap()
    }

    #[test]
    fn test_groups_runs_by_metadata() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "Hello"),
            span(12.0, "Arial", 0, "world"),
            span(12.0, "Courier", 0, "fn main()"),
        ]);

        assert_eq!(a.fragment_count(), 2);
        assert_eq!(a.span_count(), 3);
        assert_eq!(a.fragments(0, None)[0].span_count(), 2);
        assert_eq!(a.fragments(0, None)[1].font_family, "Courier");
    }

    #[test]
    fn test_fragment_indexes_count_up() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "a"),
            span(14.0, "Arial", 0, "b"),
            span(16.0, "Arial", 0, "c"),
        ]);

        let indexes: Vec<usize> = a.fragments(0, None).iter().map(|f| f.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_color_change_splits_fragments() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0x000000, "black"),
            span(12.0, "Arial", 0xFF0000, "red"),
        ]);
        assert_eq!(a.fragment_count(), 2);
    }

    #[test]
    fn test_empty_spans_rejected() {
        let result = PdfAnalyzer::from_spans(Vec::new());
        assert!(matches!(result, Err(Error::EmptyDocument)));
    }

    #[test]
    fn test_fragment_strict_access() {
        let a = analyzer(vec![span(12.0, "Arial", 0, "only")]);

        assert_eq!(a.fragment(0).unwrap().plain_text(), "only");
        assert!(matches!(
            a.fragment(5),
            Err(Error::FragmentOutOfRange(5, 1))
        ));
    }

    #[test]
    fn test_fragments_range_clamps() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "a"),
            span(14.0, "Arial", 0, "b"),
        ]);

        assert_eq!(a.fragments(0, Some(100)).len(), 2);
        assert!(a.fragments(50, None).is_empty());
        assert!(a.fragments(1, Some(1)).is_empty());
        // start past end clamps instead of panicking
        assert!(a.fragments(3, Some(2)).is_empty());
    }

    #[test]
    fn test_merge_hyperlinks_sets_override() {
        let mut a = analyzer(vec![
            span(10.0, "Arial", HYPERLINK_COLOR, "https://example.com/very/"),
            span(10.0, "Arial", HYPERLINK_COLOR, "long/path"),
        ]);

        assert_eq!(a.merge_hyperlinks(0, None), 1);
        let fragment = a.fragment(0).unwrap();
        assert!(fragment.is_merged());
        assert_eq!(fragment.plain_text(), "https://example.com/very/long/path");
        // The underlying spans are untouched
        assert_eq!(fragment.span_count(), 2);
    }

    #[test]
    fn test_merge_requires_color_and_pattern() {
        let mut a = analyzer(vec![
            span(10.0, "Arial", HYPERLINK_COLOR, "not a url"),
            span(10.0, "Arial", 0x0000FF, "https://example.com/"),
        ]);

        assert_eq!(a.merge_hyperlinks(0, None), 0);
        assert!(!a.fragment(0).unwrap().is_merged());
        assert!(!a.fragment(1).unwrap().is_merged());
    }

    #[test]
    fn test_merge_pattern_checks_first_span_only() {
        let mut a = analyzer(vec![
            span(10.0, "Arial", HYPERLINK_COLOR, "see "),
            span(10.0, "Arial", HYPERLINK_COLOR, "https://example.com/"),
        ]);

        // Both spans share metadata, so the URL sits in span 1 and the
        // fragment does not qualify.
        assert_eq!(a.merge_hyperlinks(0, None), 0);
    }

    #[test]
    fn test_merge_respects_range() {
        let mut a = analyzer(vec![
            span(10.0, "Arial", HYPERLINK_COLOR, "http://a.io/"),
            span(12.0, "Arial", HYPERLINK_COLOR, "http://b.io/"),
        ]);

        assert_eq!(a.merge_hyperlinks(1, None), 1);
        assert!(!a.fragment(0).unwrap().is_merged());
        assert!(a.fragment(1).unwrap().is_merged());
    }

    #[test]
    fn test_merge_counts_again_on_rerun() {
        let mut a = analyzer(vec![span(10.0, "Arial", HYPERLINK_COLOR, "http://a.io/")]);

        assert_eq!(a.merge_hyperlinks(0, None), 1);
        assert_eq!(a.merge_hyperlinks(0, None), 1);
        assert_eq!(a.fragment(0).unwrap().plain_text(), "http://a.io/");
    }

    #[test]
    fn test_paragraph_concatenates_uniform_sizes() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "One "),
            span(12.0, "Courier", 0, "two "),
        ]);

        let p = a.paragraph(0, None).unwrap();
        assert_eq!(p.text, "One two ");
        assert!(p.is_unbroken());
    }

    #[test]
    fn test_paragraph_breaks_at_size_change() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "body "),
            span(12.0, "Courier", 0, "code "),
            span(14.0, "Arial", 0, "Heading"),
            span(12.0, "Arial", 0, "more"),
        ]);

        let p = a.paragraph(0, None).unwrap();
        assert_eq!(p.text, "body code ");
        assert_eq!(p.break_index, Some(2));
    }

    #[test]
    fn test_paragraph_break_is_relative_to_document() {
        let a = analyzer(vec![
            span(14.0, "Arial", 0, "Heading"),
            span(12.0, "Arial", 0, "body "),
            span(12.0, "Courier", 0, "code"),
            span(16.0, "Arial", 0, "Next"),
        ]);

        let p = a.paragraph(1, None).unwrap();
        assert_eq!(p.text, "body code");
        assert_eq!(p.break_index, Some(3));
    }

    #[test]
    fn test_paragraph_respects_end() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "a"),
            span(12.0, "Courier", 0, "b"),
            span(14.0, "Arial", 0, "c"),
        ]);

        // The size change at fragment 2 is outside the range
        let p = a.paragraph(0, Some(2)).unwrap();
        assert_eq!(p.text, "ab");
        assert!(p.is_unbroken());
    }

    #[test]
    fn test_paragraph_empty_range_keeps_start_text() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "body"),
            span(14.0, "Arial", 0, "Heading"),
        ]);

        // An end at or before start leaves nothing to walk
        let p = a.paragraph(0, Some(0)).unwrap();
        assert_eq!(p.text, "body");
        assert!(p.is_unbroken());

        let p = a.paragraph(1, Some(1)).unwrap();
        assert_eq!(p.text, "Heading");
        assert!(p.is_unbroken());
    }

    #[test]
    fn test_paragraph_out_of_range() {
        let a = analyzer(vec![span(12.0, "Arial", 0, "only")]);

        assert!(matches!(
            a.paragraph(10, None),
            Err(Error::FragmentOutOfRange(10, 1))
        ));
        // The start bound alone decides the error, not the range
        assert!(matches!(
            a.paragraph(1, Some(0)),
            Err(Error::FragmentOutOfRange(1, 1))
        ));
    }

    #[test]
    fn test_paragraph_uses_merged_text() {
        let mut a = analyzer(vec![
            span(12.0, "Arial", 0, "Docs at "),
            span(12.0, "Arial", HYPERLINK_COLOR, "https://docs.rs/"),
            span(12.0, "Arial", HYPERLINK_COLOR, "pdfrag"),
        ]);
        a.merge_hyperlinks(0, None);

        let p = a.paragraph(0, None).unwrap();
        assert_eq!(p.text, "Docs at https://docs.rs/pdfrag");
    }

    #[test]
    fn test_find_text_exact_match_only() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "Hello"),
            span(12.0, "Arial", 0, "world"),
            span(14.0, "Arial", 0, "world"),
        ]);

        assert_eq!(a.find_text("world", 0, None), Some((0, 1)));
        assert_eq!(a.find_text("worl", 0, None), None);
        assert_eq!(a.find_text("World", 0, None), None);
    }

    #[test]
    fn test_find_text_respects_range() {
        let a = analyzer(vec![
            span(12.0, "Arial", 0, "target"),
            span(14.0, "Arial", 0, "filler"),
            span(16.0, "Arial", 0, "target"),
        ]);

        assert_eq!(a.find_text("target", 1, None), Some((2, 0)));
        assert_eq!(a.find_text("target", 1, Some(2)), None);
    }

    #[test]
    fn test_find_text_missing_is_none() {
        let a = analyzer(vec![span(12.0, "Arial", 0, "present")]);
        assert_eq!(a.find_text("absent", 0, None), None);
    }
}
