/*!
 * Error types for the locali18n library.
 *
 * `I18nError` is what every public operation returns. It is `Clone` because a
 * single outcome (success or failure) is shared by every caller waiting on the
 * same cache entry. `ProviderError` describes transport failures inside the
 * HTTP-backed providers before they are given translation context.
 */

use thiserror::Error;

use crate::translation::language_pair::LanguagePair;

/// Number of characters of the offending input kept in a `TranslationFailed` error
pub const EXCERPT_CHARS: usize = 30;

/// Errors surfaced by sessions, translations and the consumption layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The translation capability is missing or disabled
    #[error("The '{capability}' capability is not available. Ensure the platform supports this feature and it's enabled.")]
    CapabilityUnavailable {
        /// Path of the missing capability
        capability: String,
    },

    /// The capability refused to create a session for the pair
    #[error("Failed to create translation session for {pair}: {reason}")]
    SessionCreationFailed {
        pair: LanguagePair,
        reason: String,
    },

    /// The capability rejected a single translation
    #[error("Failed to translate text starting with \"{excerpt}\" from {} to {}: {reason}", .pair.source_language(), .pair.target_language())]
    TranslationFailed {
        pair: LanguagePair,
        /// Bounded prefix of the input
        excerpt: String,
        reason: String,
    },

    /// A translator was requested outside of any translation scope
    #[error("use_translation must be called within a translation scope")]
    MissingProviderContext,

    /// A language tag cannot be used to build a cache key
    #[error("Invalid language tag '{tag}': {reason}")]
    InvalidLanguageTag {
        tag: String,
        reason: String,
    },

    /// The background task driving a cache entry stopped before producing a value
    #[error("Translation task for '{key}' stopped before completing: {reason}")]
    TaskInterrupted {
        key: String,
        reason: String,
    },
}

impl I18nError {
    /// Build a `SessionCreationFailed` for the pair
    pub fn session_creation_failed(pair: &LanguagePair, reason: impl ToString) -> Self {
        Self::SessionCreationFailed {
            pair: pair.clone(),
            reason: reason.to_string(),
        }
    }

    /// Build a `TranslationFailed` carrying a bounded excerpt of `text`
    pub fn translation_failed(pair: &LanguagePair, text: &str, reason: impl ToString) -> Self {
        Self::TranslationFailed {
            pair: pair.clone(),
            excerpt: excerpt(text),
            reason: reason.to_string(),
        }
    }

    /// Whether the error means the capability itself is absent
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable { .. })
    }
}

/// First `EXCERPT_CHARS` characters of `text`, with an ellipsis when truncated
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Errors that can occur when talking to a remote provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}
