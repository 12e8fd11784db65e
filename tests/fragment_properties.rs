//! Property tests for fragment grouping and range handling.

use pdfrag::{PdfAnalyzer, Span, HYPERLINK_COLOR};
use proptest::prelude::*;

fn arb_span() -> impl Strategy<Value = Span> {
    (
        prop_oneof![Just(8.0f32), Just(11.0), Just(14.0), Just(24.0)],
        prop_oneof![Just("Helvetica"), Just("Courier"), Just("Georgia")],
        prop_oneof![Just(0u32), Just(0xFF0000), Just(HYPERLINK_COLOR)],
        prop_oneof![
            Just("lorem".to_string()),
            Just("ipsum ".to_string()),
            Just("https://a.io/".to_string()),
            Just("x".to_string()),
        ],
    )
        .prop_map(|(size, font, color, text)| Span::new(size, font, color, text))
}

fn arb_spans() -> impl Strategy<Value = Vec<Span>> {
    prop::collection::vec(arb_span(), 1..40)
}

proptest! {
    /// Every span lands in exactly one fragment, in reading order.
    #[test]
    fn fragments_partition_the_spans(spans in arb_spans()) {
        let analyzer = PdfAnalyzer::from_spans(spans.clone()).unwrap();

        let rebuilt: Vec<Span> = analyzer
            .fragments(0, None)
            .iter()
            .flat_map(|f| f.spans.iter().cloned())
            .collect();

        prop_assert_eq!(rebuilt, spans);
    }

    /// Fragments are metadata-uniform inside and differ at boundaries.
    #[test]
    fn fragment_runs_are_maximal(spans in arb_spans()) {
        let analyzer = PdfAnalyzer::from_spans(spans).unwrap();
        let fragments = analyzer.fragments(0, None);

        for fragment in fragments {
            for span in &fragment.spans {
                prop_assert!(span.metadata_eq(&fragment.spans[0]));
            }
        }

        for pair in fragments.windows(2) {
            let last = pair[0].spans.last().unwrap();
            prop_assert!(!last.metadata_eq(&pair[1].spans[0]));
        }
    }

    #[test]
    fn fragment_indexes_match_positions(spans in arb_spans()) {
        let analyzer = PdfAnalyzer::from_spans(spans).unwrap();

        for (position, fragment) in analyzer.fragments(0, None).iter().enumerate() {
            prop_assert_eq!(fragment.index, position);
        }
    }

    /// Running the merge twice changes nothing and reports the same count.
    #[test]
    fn merge_is_idempotent(spans in arb_spans()) {
        let mut analyzer = PdfAnalyzer::from_spans(spans).unwrap();

        let first = analyzer.merge_hyperlinks(0, None);
        let texts: Vec<String> = analyzer
            .fragments(0, None)
            .iter()
            .map(|f| f.plain_text())
            .collect();

        let second = analyzer.merge_hyperlinks(0, None);
        let texts_again: Vec<String> = analyzer
            .fragments(0, None)
            .iter()
            .map(|f| f.plain_text())
            .collect();

        prop_assert_eq!(first, second);
        prop_assert_eq!(texts, texts_again);
    }

    /// The merge overrides fragment text but never touches span storage.
    #[test]
    fn merge_preserves_spans(spans in arb_spans()) {
        let mut analyzer = PdfAnalyzer::from_spans(spans.clone()).unwrap();
        analyzer.merge_hyperlinks(0, None);

        let rebuilt: Vec<Span> = analyzer
            .fragments(0, None)
            .iter()
            .flat_map(|f| f.spans.iter().cloned())
            .collect();

        prop_assert_eq!(rebuilt, spans);
    }

    /// The locator returns the first span in reading order whose text
    /// matches exactly.
    #[test]
    fn find_text_returns_first_match(
        spans in arb_spans(),
        pick in any::<prop::sample::Index>(),
    ) {
        let target = pick.get(&spans).text.clone();
        let analyzer = PdfAnalyzer::from_spans(spans).unwrap();

        let (fragment_index, span_index) = analyzer.find_text(&target, 0, None).unwrap();
        let found = &analyzer.fragment(fragment_index).unwrap().spans[span_index];
        prop_assert_eq!(&found.text, &target);

        // Nothing before the hit matches
        let mut earlier = Vec::new();
        'walk: for fragment in analyzer.fragments(0, None) {
            for (si, span) in fragment.spans.iter().enumerate() {
                if (fragment.index, si) == (fragment_index, span_index) {
                    break 'walk;
                }
                earlier.push(span.text.clone());
            }
        }
        prop_assert!(earlier.iter().all(|text| text != &target));
    }

    /// The paragraph break is the first font size change after start,
    /// and the text is the concatenation of everything before it.
    #[test]
    fn paragraph_breaks_at_first_size_change(spans in arb_spans()) {
        let analyzer = PdfAnalyzer::from_spans(spans).unwrap();
        let fragments = analyzer.fragments(0, None);
        let paragraph = analyzer.paragraph(0, None).unwrap();

        let expected_break = fragments
            .iter()
            .skip(1)
            .find(|f| f.font_size != fragments[0].font_size)
            .map(|f| f.index);
        prop_assert_eq!(paragraph.break_index, expected_break);

        let upto = expected_break.unwrap_or(fragments.len());
        let expected_text: String = fragments[..upto].iter().map(|f| f.plain_text()).collect();
        prop_assert_eq!(paragraph.text, expected_text);
    }

    /// Clamped range methods accept any bounds without panicking.
    #[test]
    fn clamped_ranges_never_panic(
        spans in arb_spans(),
        start in 0usize..100,
        end in prop::option::of(0usize..100),
    ) {
        let mut analyzer = PdfAnalyzer::from_spans(spans).unwrap();

        let slice = analyzer.fragments(start, end);
        prop_assert!(slice.len() <= analyzer.fragment_count());

        let merged = analyzer.merge_hyperlinks(start, end);
        prop_assert!(merged <= analyzer.fragment_count());

        let _ = analyzer.find_text("anything", start, end);
    }

    /// The paragraph call fails exactly when start is out of bounds;
    /// any end bound, including one at or before start, succeeds.
    #[test]
    fn paragraph_start_alone_decides_the_error(
        spans in arb_spans(),
        start in 0usize..50,
        end in prop::option::of(0usize..50),
    ) {
        let analyzer = PdfAnalyzer::from_spans(spans).unwrap();

        let result = analyzer.paragraph(start, end);
        prop_assert_eq!(result.is_ok(), start < analyzer.fragment_count());

        if let Ok(paragraph) = result {
            let first = analyzer.fragment(start).unwrap().plain_text();
            prop_assert!(paragraph.text.starts_with(&first));
        }
    }
}
