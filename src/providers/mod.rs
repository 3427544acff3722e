/*!
 * Translation capability providers.
 *
 * A provider knows how to open a session for a language pair and how to
 * translate text through a session it opened. It holds no cache state; all
 * caching and deduplication lives in `SessionManager`.
 *
 * - `platform`: adapter to the process-global platform translator
 * - `ollama`: remote provider backed by an Ollama server
 * - `mock`: deterministic offline provider
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::I18nError;
use crate::translation::language_pair::LanguagePair;

/// Common trait for all translation capability providers
///
/// Implementations are expected to attach context to their failures:
/// `CapabilityUnavailable` when the capability is missing,
/// `SessionCreationFailed` with the pair when a session is refused, and
/// `TranslationFailed` with the pair and an excerpt of the input when a
/// translation is rejected.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug + 'static {
    /// Session handle for one language pair
    type Session: Send + Sync + 'static;

    /// Short provider name used in log lines
    fn name(&self) -> &str;

    /// Open a translation session for `pair`
    async fn create_session(&self, pair: &LanguagePair) -> Result<Self::Session, I18nError>;

    /// Translate `text` through a session previously returned by `create_session`
    async fn translate(&self, session: &Self::Session, text: &str) -> Result<String, I18nError>;
}

pub mod mock;
pub mod ollama;
pub mod platform;
