//! Bounded context snippets around the first query match

use crate::normalize::nfc;
use crate::pattern::CompiledPattern;
use serde::{Deserialize, Serialize};

/// Context window defaults, in characters. Roughly 200 characters total,
/// weighted towards trailing context so the match lands near the front of a
/// list-view snippet.
pub const DEFAULT_CONTEXT_BEFORE: usize = 60;
pub const DEFAULT_CONTEXT_AFTER: usize = 140;

/// A bounded excerpt of a longer text. The truncation flags are ellipsis
/// decisions left to the caller; no ellipsis text is embedded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub truncated_before: bool,
    pub truncated_after: bool,
}

impl Snippet {
    fn whole(text: String) -> Self {
        Self {
            text,
            truncated_before: false,
            truncated_after: false,
        }
    }
}

/// Extract a context window of `before`/`after` characters around the first
/// match of `pattern` in `text`.
///
/// The flexible Arabic pattern is tried first; when it finds nothing (a
/// pure-Latin query against mixed content, say) a plain case-folded
/// substring scan over the query terms decides the position instead. With
/// no match by either method the whole text comes back untruncated.
pub fn extract_snippet(
    text: &str,
    pattern: Option<&CompiledPattern>,
    before: usize,
    after: usize,
) -> Snippet {
    let composed = nfc(text);
    let Some(match_start) = first_match(&composed, pattern) else {
        return Snippet::whole(composed);
    };
    window(&composed, match_start, before, after)
}

/// Byte offset of the earliest match in `text`, by pattern first and plain
/// substring search second.
fn first_match(text: &str, pattern: Option<&CompiledPattern>) -> Option<usize> {
    let pattern = pattern?;
    if let Some((start, _)) = pattern.find(text) {
        return Some(start);
    }
    find_plain(text, pattern.query_terms())
}

/// Case-folded substring search returning the earliest hit among `terms` as
/// a byte offset into the original `text`. Folding can change character
/// counts, so a byte-offset map carries each folded position back to its
/// source character.
fn find_plain(text: &str, terms: &[String]) -> Option<usize> {
    let mut folded = String::with_capacity(text.len());
    let mut source_offset: Vec<usize> = Vec::with_capacity(text.len());
    for (idx, c) in text.char_indices() {
        for low in c.to_lowercase() {
            let from = folded.len();
            folded.push(low);
            for _ in from..folded.len() {
                source_offset.push(idx);
            }
        }
    }

    let mut earliest: Option<usize> = None;
    for term in terms {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        if let Some(pos) = folded.find(&needle) {
            let src = source_offset[pos];
            earliest = Some(earliest.map_or(src, |e| e.min(src)));
        }
    }
    earliest
}

/// Window `text` around a match at byte offset `match_start`, snapping the
/// start forward to the next word boundary so the snippet never opens
/// mid-word. The end is left unsnapped; a trailing partial word is fine.
fn window(text: &str, match_start: usize, before: usize, after: usize) -> Snippet {
    let match_char = text[..match_start].chars().count();
    let start_char = match_char.saturating_sub(before);
    let end_char = match_char.saturating_add(after);

    let mut start = byte_at_char(text, start_char);
    let end = byte_at_char(text, end_char);

    if start > 0 {
        if let Some(space) = text[start..match_start].find(' ') {
            start += space + 1;
        }
    }

    Snippet {
        text: text[start..end].to_string(),
        truncated_before: start > 0,
        truncated_after: end < text.len(),
    }
}

/// Byte offset of the character at `char_idx`, clamped to the end of `text`.
fn byte_at_char(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Direction;
    use crate::pattern::compile_pattern;

    fn compile(query: &str) -> CompiledPattern {
        compile_pattern(query, Direction::Rtl).expect("pattern should compile")
    }

    #[test]
    fn test_no_match_returns_whole_text() {
        let p = compile("قرآن");
        let snippet = extract_snippet("hello world", Some(&p), 10, 10);
        assert_eq!(snippet.text, "hello world");
        assert!(!snippet.truncated_before);
        assert!(!snippet.truncated_after);
    }

    #[test]
    fn test_none_pattern_returns_whole_text() {
        let snippet = extract_snippet("نص طويل", None, 10, 10);
        assert_eq!(snippet.text, "نص طويل");
        assert!(!snippet.truncated_before);
        assert!(!snippet.truncated_after);
    }

    #[test]
    fn test_window_around_deep_match_snaps_to_word_boundary() {
        // 500 characters: the match starts at character offset 300.
        let text = format!("{}needle{}", "word ".repeat(60), " tail".repeat(39));
        assert_eq!(text.chars().count(), 501);
        let p = compile("needle");

        let snippet = extract_snippet(&text, Some(&p), 60, 140);
        assert!(snippet.truncated_before);
        assert!(snippet.truncated_after);
        // Start snapped forward to the space at character 244, so the
        // window opens on a whole word at or after 300 - 60 = 240.
        assert!(snippet.text.starts_with("word "));
        assert!(snippet.text.contains("needle"));
        assert_eq!(snippet.text.chars().count(), 440 - 245);
    }

    #[test]
    fn test_match_near_start_is_not_truncated_before() {
        let text = format!("intro needle{}", " tail".repeat(60));
        let p = compile("needle");
        let snippet = extract_snippet(&text, Some(&p), 60, 140);
        assert!(!snippet.truncated_before);
        assert!(snippet.truncated_after);
        assert!(snippet.text.starts_with("intro needle"));
    }

    #[test]
    fn test_short_text_is_never_truncated() {
        let p = compile("كتاب");
        let snippet = extract_snippet("في كتاب الصلاة", Some(&p), 60, 140);
        assert_eq!(snippet.text, "في كتاب الصلاة");
        assert!(!snippet.truncated_before);
        assert!(!snippet.truncated_after);
    }

    #[test]
    fn test_arabic_match_with_diacritized_source() {
        let text = format!("{}وَالْأَصْلُ في ذلك", "كلمة ".repeat(40));
        let p = compile("والأصل");
        let snippet = extract_snippet(&text, Some(&p), 20, 40);
        assert!(snippet.truncated_before);
        assert!(snippet.text.contains("وَالْأَصْلُ"));
        assert!(snippet.text.starts_with("كلمة"));
    }

    #[test]
    fn test_latin_query_finds_mixed_case_term() {
        let text = format!("{}the Fiqh ruling{}", "intro ".repeat(30), " more".repeat(40));
        let p = compile("FIQH");
        let snippet = extract_snippet(&text, Some(&p), 20, 60);
        assert!(snippet.text.contains("Fiqh"));
    }

    #[test]
    fn test_plain_fallback_engages_when_pattern_misses() {
        // An RTL-compiled digit query matches only Arabic-Indic digits, so
        // the pattern misses Latin "2024"; the raw-term fallback finds it.
        let text = format!("{}tahun 2024 masehi{}", "kata ".repeat(30), " lagi".repeat(40));
        let p = compile("2024");
        assert!(p.find(&text).is_none());
        let snippet = extract_snippet(&text, Some(&p), 20, 60);
        assert!(snippet.text.contains("2024"));
        assert!(snippet.truncated_before);
    }

    #[test]
    fn test_fallback_survives_vanishing_leading_term() {
        // A pure-tashkeel first token compiles to no term; the fallback must
        // still search the surviving raw term rather than the vanished one.
        let text = format!("{}tahun 2024 masehi{}", "kata ".repeat(30), " lagi".repeat(40));
        let p = compile("\u{064B} 2024");
        let snippet = extract_snippet(&text, Some(&p), 20, 60);
        assert!(snippet.text.contains("2024"));
        assert!(snippet.truncated_before);
        assert!(snippet.truncated_after);
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        // Multi-byte text: slicing must never split a codepoint.
        let text = "و".repeat(400);
        let p = compile("لا يوجد");
        let snippet = extract_snippet(&text, Some(&p), 10, 10);
        assert_eq!(snippet.text, text);
    }
}
