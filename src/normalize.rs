//! Arabic text normalization: NFC composition, tashkeel stripping, digit mapping

use serde::{Deserialize, Serialize};
use unicode_normalization::{is_nfc, UnicodeNormalization};

/// Reading direction of the content being rendered. Decides whether Latin
/// digits are mapped to Arabic-Indic form; passed explicitly per call, never
/// inferred from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Rtl,
    Ltr,
}

/// Arabic-Indic digit codepoints, indexed by ASCII digit value.
const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// True for the marks stripped before matching: the tashkeel block
/// U+064B-U+065F, the tatweel U+0640, and the superscript alef U+0670.
pub fn is_tashkeel(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0640}' | '\u{0670}')
}

/// Unicode canonical composition. Source text may carry base letters and
/// combining marks either precomposed or decomposed; matching must not care.
pub fn nfc(text: &str) -> String {
    if is_nfc(text) {
        text.to_string()
    } else {
        text.nfc().collect()
    }
}

/// Remove tashkeel, tatweel and superscript alef.
pub fn strip_tashkeel(text: &str) -> String {
    text.chars().filter(|c| !is_tashkeel(*c)).collect()
}

/// Map ASCII digits 0-9 to Arabic-Indic digits. Idempotent; every other
/// character passes through unchanged.
pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => ARABIC_INDIC_DIGITS[(c as usize) - ('0' as usize)],
            _ => c,
        })
        .collect()
}

/// Produce the matching key for a string: NFC composition, tashkeel
/// stripping, and (for right-to-left content) Latin digit mapping.
/// The original text is never mutated for display, only for comparison.
pub fn normalize(text: &str, direction: Direction) -> String {
    let stripped = strip_tashkeel(&nfc(text));
    // Recompose once more: stripping a mark can bring a base and a kept
    // combining mark next to each other, and the key must stay in NFC.
    let composed = nfc(&stripped);
    match direction {
        Direction::Rtl => to_arabic_digits(&composed),
        Direction::Ltr => composed,
    }
}
