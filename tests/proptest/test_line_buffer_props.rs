//! Property-based tests for line accumulation

use proptest::prelude::*;
use shellwrap::wrapper::LineBuffer;
use shellwrap::shell::tokenize;
use shellwrap::LineKind;

proptest! {
    #[test]
    fn test_chunking_does_not_change_result(
        text in "[a-z \\n\\r]{0,200}",
        cuts in prop::collection::vec(0usize..200, 0..20),
    ) {
        let mut whole = LineBuffer::new();
        whole.append(&text, LineKind::Normal);

        let mut points: Vec<usize> = cuts.into_iter().filter(|c| *c <= text.len()).collect();
        points.push(0);
        points.push(text.len());
        points.sort_unstable();
        points.dedup();

        let mut pieces = LineBuffer::new();
        for window in points.windows(2) {
            pieces.append(&text[window[0]..window[1]], LineKind::Normal);
        }

        prop_assert_eq!(pieces.drain(), whole.drain());
        prop_assert_eq!(pieces.fragment(), whole.fragment());
    }

    #[test]
    fn test_line_count_matches_newlines(text in "[a-z\\n]{0,200}") {
        let mut buffer = LineBuffer::new();
        buffer.append(&text, LineKind::Normal);
        prop_assert_eq!(buffer.len(), text.matches('\n').count());
        prop_assert!(!buffer.fragment().contains('\n'));
    }

    #[test]
    fn test_completed_lines_have_no_breaks(text in "(\\PC|\\n){0,200}") {
        let mut buffer = LineBuffer::new();
        buffer.append(&text, LineKind::Error);
        for line in buffer.drain() {
            prop_assert!(!line.text().contains('\n'));
            prop_assert_eq!(line.kind(), LineKind::Error);
        }
    }

    #[test]
    fn test_plain_words_tokenize_like_split(words in prop::collection::vec("[a-z0-9/._-]{1,10}", 0..10)) {
        let line = words.join("  ");
        prop_assert_eq!(tokenize(&line), words);
    }
}
