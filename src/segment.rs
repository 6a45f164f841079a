//! Lossless segmentation of text into matched and unmatched spans

use crate::pattern::CompiledPattern;
use serde::{Deserialize, Serialize};

/// One span of segmented text. Concatenating the `text` of every segment in
/// order reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub is_match: bool,
}

impl Segment {
    fn matched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: true,
        }
    }

    fn unmatched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_match: false,
        }
    }
}

/// Scan `text` against a compiled pattern and return the ordered sequence of
/// matched and unmatched spans, covering the whole input with no overlap.
///
/// A `None` pattern (empty query) yields the whole text as one unmatched
/// segment; empty text yields an empty sequence.
///
/// Patterns are compiled from NFC-composed queries, and the tashkeel run
/// between base letters only absorbs Arabic combining marks. Callers holding
/// possibly-decomposed input should pass it through [`crate::normalize::nfc`]
/// first, as the snippet and markup entry points do; `segment` itself leaves
/// the text untouched so the spans concatenate back to the input byte for
/// byte.
pub fn segment(text: &str, pattern: Option<&CompiledPattern>) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }
    let Some(pattern) = pattern else {
        return vec![Segment::unmatched(text)];
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for m in pattern.scan.find_iter(text) {
        if m.start() > cursor {
            segments.push(Segment::unmatched(&text[cursor..m.start()]));
        }
        segments.push(Segment::matched(m.as_str()));
        cursor = m.end();
    }
    if cursor < text.len() {
        segments.push(Segment::unmatched(&text[cursor..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{nfc, Direction};
    use crate::pattern::compile_pattern;
    use proptest::prelude::*;

    fn compile(query: &str) -> crate::pattern::CompiledPattern {
        compile_pattern(query, Direction::Rtl).expect("pattern should compile")
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_none_pattern_yields_single_unmatched_segment() {
        let segments = segment("نص بدون بحث", None);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_match);
        assert_eq!(segments[0].text, "نص بدون بحث");
    }

    #[test]
    fn test_empty_text_yields_no_segments() {
        assert!(segment("", Some(&compile("كتاب"))).is_empty());
        assert!(segment("", None).is_empty());
    }

    #[test]
    fn test_basic_segmentation() {
        let p = compile("كتاب");
        let segments = segment("في كتاب الصلاة", Some(&p));
        assert_eq!(segments.len(), 3);
        assert!(!segments[0].is_match);
        assert!(segments[1].is_match);
        assert_eq!(segments[1].text, "كتاب");
        assert!(!segments[2].is_match);
        assert_eq!(joined(&segments), "في كتاب الصلاة");
    }

    #[test]
    fn test_diacritized_source_marked_as_one_matched_span() {
        let p = compile("والأصل");
        let segments = segment("وَالْأَصْلُ", Some(&p));
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_match);
        assert_eq!(segments[0].text, "وَالْأَصْلُ");
    }

    #[test]
    fn test_letterform_variant_in_source_is_matched() {
        let p = compile("الهدايه");
        let segments = segment("شرح الهداية للمرغيناني", Some(&p));
        let matched: Vec<_> = segments.iter().filter(|s| s.is_match).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].text, "الهداية");
    }

    #[test]
    fn test_multiple_occurrences() {
        let p = compile("باب");
        let segments = segment("باب الطهارة ثم باب الصلاة", Some(&p));
        assert_eq!(segments.iter().filter(|s| s.is_match).count(), 2);
        assert_eq!(joined(&segments), "باب الطهارة ثم باب الصلاة");
    }

    #[test]
    fn test_decomposed_input_matches_once_composed() {
        // U+0627 U+0653 is the decomposed form of آ (U+0622); the madda is
        // not tashkeel, so the raw sequence misses while its NFC form hits.
        let p = compile("آصال");
        let decomposed = "\u{0627}\u{0653}صال";
        assert!(segment(decomposed, Some(&p))
            .iter()
            .all(|s| !s.is_match));
        let segments = segment(&nfc(decomposed), Some(&p));
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_match);
    }

    #[test]
    fn test_latin_case_insensitive_segmentation() {
        let p = compile("imam");
        let segments = segment("the Imam said", Some(&p));
        assert_eq!(segments[1].text, "Imam");
        assert!(segments[1].is_match);
    }

    proptest! {
        #[test]
        fn segmentation_is_lossless(text in "\\PC*", query in "\\PC{0,12}") {
            let pattern = compile_pattern(&query, Direction::Rtl);
            let segments = segment(&text, pattern.as_ref());
            prop_assert_eq!(joined(&segments), text);
        }

        #[test]
        fn matched_spans_pass_the_anchored_test(text in "\\PC*") {
            let p = compile("كتاب");
            for seg in segment(&text, Some(&p)) {
                if seg.is_match {
                    prop_assert!(p.is_exact_match(&seg.text));
                }
            }
        }
    }
}
