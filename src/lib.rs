//! Ibarat - Arabic-aware fuzzy matching and highlighting
//!
//! Shared matching engine for search views over classical Arabic texts:
//! diacritic-tolerant pattern compilation, lossless match segmentation,
//! bounded context snippets, and markup-safe highlighting. One library
//! surface for every call site that needs "where does this query match",
//! whatever the text's diacritization, letterforms, numerals, or markup.

pub mod cache;
pub mod html;
pub mod normalize;
pub mod pattern;
pub mod segment;
pub mod snippet;

pub use cache::PatternCache;
#[cfg(feature = "parallel")]
pub use html::highlight_html_batch;
pub use html::{highlight_html, highlight_text, sanitize_em, strip_tags, unescape_entities};
pub use normalize::{is_tashkeel, nfc, normalize, strip_tashkeel, to_arabic_digits, Direction};
pub use pattern::{compile_pattern, CompiledPattern, MAX_TERMS};
pub use segment::{segment, Segment};
pub use snippet::{extract_snippet, Snippet, DEFAULT_CONTEXT_AFTER, DEFAULT_CONTEXT_BEFORE};
