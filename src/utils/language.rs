use once_cell::sync::Lazy;
use regex::Regex;
use whatlang::{detect, Script};

use crate::catalog::Locale;

const MIN_ALPHA_CHARS: usize = 2;
const LATIN_CONFIDENCE_THRESHOLD: f64 = 0.68;
const NON_LATIN_CONFIDENCE_THRESHOLD: f64 = 0.5;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid url regex"));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

fn normalize_text_for_detection(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, " ");
    let without_quotes = without_urls.replace(['`', '"'], " ");
    WHITESPACE_RE
        .replace_all(&without_quotes, " ")
        .trim()
        .to_string()
}

fn alphabetic_char_count(text: &str) -> usize {
    text.chars().filter(|ch| ch.is_alphabetic()).count()
}

pub fn detect_language_name(text: &str) -> Option<String> {
    let normalized = normalize_text_for_detection(text);
    if normalized.is_empty() || alphabetic_char_count(&normalized) < MIN_ALPHA_CHARS {
        return None;
    }

    let info = detect(&normalized)?;
    if info.is_reliable() {
        return Some(info.lang().eng_name().to_string());
    }

    let threshold = match info.script() {
        Script::Latin => LATIN_CONFIDENCE_THRESHOLD,
        _ => NON_LATIN_CONFIDENCE_THRESHOLD,
    };
    if info.confidence() >= threshold {
        return Some(info.lang().eng_name().to_string());
    }

    None
}

/// Decides whether a free-text field must go through the translation model
/// before it is embedded in an English prompt. Text without letters (ages such
/// as "25") never needs it; when detection is inconclusive the session locale
/// decides.
pub fn needs_english_translation(text: &str, locale: Locale) -> bool {
    let normalized = normalize_text_for_detection(text);
    if alphabetic_char_count(&normalized) < MIN_ALPHA_CHARS {
        return false;
    }

    match detect_language_name(&normalized) {
        Some(language) => language != "English",
        None => locale != Locale::En,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_age_never_needs_translation() {
        assert!(!needs_english_translation("25", Locale::Pt));
        assert!(!needs_english_translation("  ", Locale::Pt));
    }

    #[test]
    fn portuguese_instruction_needs_translation() {
        assert!(needs_english_translation(
            "Deixe a jaqueta com uma aparência envelhecida e um pouco mais larga, por favor",
            Locale::Pt
        ));
    }

    #[test]
    fn english_instruction_is_kept_as_is() {
        assert!(!needs_english_translation(
            "Make the leather jacket look weathered and slightly oversized, please",
            Locale::Pt
        ));
    }

    #[test]
    fn short_ambiguous_text_follows_locale() {
        assert_eq!(detect_language_name("ok"), None);
        assert!(!needs_english_translation("ok", Locale::En));
        assert!(needs_english_translation("ok", Locale::Pt));
    }
}
