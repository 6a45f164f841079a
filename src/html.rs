//! Markup-safe highlighting: segmenting applied only inside HTML text nodes

use crate::normalize::{nfc, to_arabic_digits, Direction};
use crate::pattern::CompiledPattern;
use crate::segment::segment;

/// Decode the HTML entities the storage layer escapes: `&lt;`, `&gt;`,
/// `&quot;`, `&#39;`, `&amp;`. Ampersand last so freshly produced `&` never
/// re-decodes.
pub fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Remove every tag, keeping text content. An unclosed trailing tag is
/// discarded with its remainder.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        match tag_len(&rest[lt..]) {
            Some(len) => rest = &rest[lt + len..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Keep `<em>`/`</em>` emphasis (the external index pre-highlights its
/// snippets with them) and strip every other tag.
pub fn sanitize_em(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        match tag_len(&rest[lt..]) {
            Some(len) => {
                let tag = &rest[lt..lt + len];
                if tag.eq_ignore_ascii_case("<em>") || tag.eq_ignore_ascii_case("</em>") {
                    out.push_str(tag);
                }
                rest = &rest[lt + len..];
            }
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Highlight matches inside an HTML fragment without touching tags or
/// attributes. Text nodes are digit-converted for RTL content, segmented,
/// and matched spans replaced by `wrap(span)`; everything between `<` and
/// `>` is reconstructed byte-for-byte.
///
/// Input that does not look like markup degrades to plain-text processing,
/// with `wrap` still honored for matched spans. A malformed trailing tag is
/// copied through verbatim; content is never dropped.
pub fn highlight_html<F>(
    html: &str,
    pattern: Option<&CompiledPattern>,
    direction: Direction,
    wrap: F,
) -> String
where
    F: Fn(&str) -> String,
{
    let composed = nfc(html);
    if !looks_like_markup(&composed) {
        return render_text_node(&composed, pattern, direction, &wrap);
    }

    let mut out = String::with_capacity(composed.len());
    let mut rest = composed.as_str();
    while let Some(lt) = rest.find('<') {
        out.push_str(&render_text_node(&rest[..lt], pattern, direction, &wrap));
        let tail = &rest[lt..];
        match tag_len(tail) {
            Some(len) => {
                out.push_str(&tail[..len]);
                rest = &tail[len..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(&render_text_node(rest, pattern, direction, &wrap));
    out
}

/// Plain-text variant of [`highlight_html`]: digit conversion plus
/// segmenting on a string known to carry no markup.
pub fn highlight_text<F>(
    text: &str,
    pattern: Option<&CompiledPattern>,
    direction: Direction,
    wrap: F,
) -> String
where
    F: Fn(&str) -> String,
{
    render_text_node(&nfc(text), pattern, direction, &wrap)
}

/// Highlight many independent entries in parallel. Entries share the
/// pattern but nothing else, so no ordering or locking is involved beyond
/// the output order matching the input order.
#[cfg(feature = "parallel")]
pub fn highlight_html_batch<F>(
    entries: &[String],
    pattern: Option<&CompiledPattern>,
    direction: Direction,
    wrap: F,
) -> Vec<String>
where
    F: Fn(&str) -> String + Sync,
{
    use rayon::prelude::*;
    entries
        .par_iter()
        .map(|entry| highlight_html(entry, pattern, direction, &wrap))
        .collect()
}

/// Apply the per-text-node transforms: digit mapping for RTL content, then
/// segmenting with matched spans passed through `wrap`. Unmatched spans get
/// no structural transforms, only the digit mapping.
fn render_text_node<F>(
    text: &str,
    pattern: Option<&CompiledPattern>,
    direction: Direction,
    wrap: &F,
) -> String
where
    F: Fn(&str) -> String,
{
    if text.is_empty() {
        return String::new();
    }
    let content = match direction {
        Direction::Rtl => to_arabic_digits(text),
        Direction::Ltr => text.to_string(),
    };
    let mut out = String::with_capacity(content.len());
    for seg in segment(&content, pattern) {
        if seg.is_match {
            out.push_str(&wrap(&seg.text));
        } else {
            out.push_str(&seg.text);
        }
    }
    out
}

/// Whether the input contains something tag-shaped: `<`, an optional `/`,
/// an ASCII letter, and a closing `>` later on.
fn looks_like_markup(text: &str) -> bool {
    let mut rest = text;
    while let Some(pos) = rest.find('<') {
        rest = &rest[pos + 1..];
        let name = rest.strip_prefix('/').unwrap_or(rest);
        if name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) && name.contains('>') {
            return true;
        }
    }
    false
}

/// Byte length of the tag starting at `tag` (which begins with `<`),
/// including the closing `>`. Quote-aware so `>` inside an attribute value
/// does not end the tag. `None` when the tag never closes.
fn tag_len(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tag.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i + 1),
            (None, _) => {}
        }
    }
    None
}
