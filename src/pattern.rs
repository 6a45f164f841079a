//! Diacritic-tolerant pattern compilation for Arabic search queries

use crate::normalize::{nfc, normalize, Direction};
use regex_lite::Regex;

/// Letterforms treated as interchangeable when matching. The classes are
/// disjoint; a letter belongs to at most one of them.
const EQUIVALENCE_CLASSES: [&str; 3] = [
    "اأإآ", // alef variants
    "يى",   // yaa / alef maqsura
    "هة",   // haa / taa marbuta
];

/// Character class matching a run of tashkeel marks. The same set the
/// normalizer strips from the query is allowed to occur in the source text
/// between matched base letters.
const TASHKEEL_RUN: &str = "[\u{0640}\u{064B}-\u{065F}\u{0670}]*";

/// Upper bound on query terms. Extra terms are silently dropped so a
/// degenerate query cannot blow up the pattern size.
pub const MAX_TERMS: usize = 64;

/// A compiled disjunction of per-term matchers, tolerant of optional
/// diacritics after every base letter and of letterform variants.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub(crate) scan: Regex,
    anchored: Regex,
    terms: Vec<String>,
    query_terms: Vec<String>,
}

impl CompiledPattern {
    /// Byte range of the earliest match in `text`, if any.
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.scan.find(text).map(|m| (m.start(), m.end()))
    }

    /// Whether the whole of `text` is a single match. Used to classify a
    /// complete span as matched versus merely overlapping a match.
    pub fn is_exact_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }

    /// The normalized query terms the pattern was built from, in query
    /// order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// The query terms as written (NFC only, no stripping or digit
    /// mapping). The snippet extractor falls back to plain substring search
    /// over these when the flexible pattern finds nothing.
    pub fn query_terms(&self) -> &[String] {
        &self.query_terms
    }
}

/// Compile a raw query into a [`CompiledPattern`].
///
/// The query is reduced to its matching key (NFC, tashkeel stripped, digits
/// mapped for RTL content) and split on whitespace. Returns `None` when no
/// terms remain; callers must treat that as "match nothing", not an error.
pub fn compile_pattern(query: &str, direction: Direction) -> Option<CompiledPattern> {
    // Normalize term by term so each matching key stays paired with the
    // raw term it came from; a pure-tashkeel token normalizes away and
    // contributes to neither list.
    let composed = nfc(query);
    let mut terms: Vec<String> = Vec::new();
    let mut query_terms: Vec<String> = Vec::new();
    for raw in composed.split_whitespace() {
        let key = normalize(raw, direction);
        if key.is_empty() {
            continue;
        }
        terms.push(key);
        query_terms.push(raw.to_string());
    }
    if terms.is_empty() {
        return None;
    }
    if terms.len() > MAX_TERMS {
        tracing::debug!(
            terms = terms.len(),
            cap = MAX_TERMS,
            "query exceeds term cap, extra terms dropped"
        );
        terms.truncate(MAX_TERMS);
        query_terms.truncate(MAX_TERMS);
    }

    let alternation = terms
        .iter()
        .map(|t| term_pattern(t))
        .collect::<Vec<_>>()
        .join("|");

    let scan = Regex::new(&format!("(?i)(?:{})", alternation));
    let anchored = Regex::new(&format!("(?i)^(?:{})$", alternation));
    match (scan, anchored) {
        (Ok(scan), Ok(anchored)) => Some(CompiledPattern {
            scan,
            anchored,
            terms,
            query_terms,
        }),
        (Err(e), _) | (_, Err(e)) => {
            // Every metacharacter is escaped before substitution, so this
            // should be unreachable; degrade to "match nothing" regardless.
            tracing::warn!(error = %e, "query pattern failed to compile, treating as no-match");
            None
        }
    }
}

/// Build the matcher for a single normalized term: each base character as a
/// literal or its equivalence class, followed by an optional tashkeel run.
fn term_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() * 8);
    for c in term.chars() {
        match EQUIVALENCE_CLASSES.iter().find(|class| class.contains(c)) {
            Some(class) => {
                pattern.push('[');
                pattern.push_str(class);
                pattern.push(']');
            }
            None => push_escaped(&mut pattern, c),
        }
        pattern.push_str(TASHKEEL_RUN);
    }
    pattern
}

fn push_escaped(dst: &mut String, c: char) {
    if matches!(
        c,
        '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$' | '\\'
    ) {
        dst.push('\\');
    }
    dst.push(c);
}
