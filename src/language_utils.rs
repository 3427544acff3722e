use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Language tags used by a `LanguagePair` may carry script or region subtags
/// (`pt-BR`, `zh-Hant`). These helpers look only at the primary subtag, which
/// must be an ISO 639-1 or ISO 639-2 code.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Primary subtag of a language tag, lowercased (`"pt-BR"` -> `"pt"`)
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn lookup(code: &str) -> Option<(Language, LanguageCodeType)> {
    match code.len() {
        2 => Language::from_639_1(code).map(|lang| (lang, LanguageCodeType::Part1)),
        3 => Language::from_639_3(code)
            .map(|lang| (lang, LanguageCodeType::Part2T))
            .or_else(|| {
                BIBLIOGRAPHIC_CODES
                    .iter()
                    .find(|(bibliographic, _)| *bibliographic == code)
                    .and_then(|(_, terminology)| Language::from_639_3(terminology))
                    .map(|lang| (lang, LanguageCodeType::Part2B))
            }),
        _ => None,
    }
}

/// Validate that the primary subtag of `tag` is a known ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(tag: &str) -> Result<LanguageCodeType> {
    lookup(&primary_subtag(tag))
        .map(|(_, kind)| kind)
        .ok_or_else(|| anyhow!("Invalid language code: {}", tag))
}

/// Get the English language name for a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    lookup(&primary_subtag(tag))
        .map(|(lang, _)| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", tag))
}

/// Language name for log lines and prompts, falling back to the raw tag
pub fn display_name(tag: &str) -> String {
    get_language_name(tag).unwrap_or_else(|_| tag.to_string())
}
