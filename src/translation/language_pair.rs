/*!
 * Language pair and the cache keys derived from it.
 */

use std::fmt;

use crate::errors::I18nError;

/// Separator between the two tags of a pair key. Never valid inside a tag.
pub const KEY_SEPARATOR: char = ':';

/// Source and target language of a translation session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    source_language: String,
    target_language: String,
}

impl LanguagePair {
    /// Create a pair, rejecting tags that would make cache keys ambiguous
    pub fn new(source_language: impl Into<String>, target_language: impl Into<String>) -> Result<Self, I18nError> {
        let source_language = source_language.into();
        let target_language = target_language.into();

        check_tag(&source_language)?;
        check_tag(&target_language)?;

        Ok(Self {
            source_language,
            target_language,
        })
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Key of the session cache entry for this pair
    pub fn cache_key(&self) -> String {
        format!("{}{}{}", self.source_language, KEY_SEPARATOR, self.target_language)
    }

    /// Key of the translation cache entry for `text` under this pair
    pub fn translation_key(&self, text: &str) -> TranslationKey {
        TranslationKey {
            pair_key: self.cache_key(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_language, self.target_language)
    }
}

/// Key of a translation cache entry: the pair key plus the exact input text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    pair_key: String,
    text: String,
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pair_key, KEY_SEPARATOR, crate::errors::excerpt(&self.text))
    }
}

fn check_tag(tag: &str) -> Result<(), I18nError> {
    let reason = if tag.is_empty() {
        "tag is empty"
    } else if tag.contains(KEY_SEPARATOR) {
        "tag contains the key separator ':'"
    } else if tag.chars().any(char::is_whitespace) {
        "tag contains whitespace"
    } else {
        return Ok(());
    };

    Err(I18nError::InvalidLanguageTag {
        tag: tag.to_string(),
        reason: reason.to_string(),
    })
}
