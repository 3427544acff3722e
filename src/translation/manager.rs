/*!
 * Session manager: lazily created, cached translation sessions and results.
 *
 * Two caches live here:
 * - sessions, keyed by language pair
 * - translations, keyed by language pair plus input text
 *
 * Both deduplicate in-flight work, so concurrent requests for one key cause a
 * single provider call, and both keep their outcome (failures included) for
 * the lifetime of the manager.
 */

use log::{debug, info, warn};
use std::sync::Arc;

use crate::errors::I18nError;
use crate::providers::TranslationProvider;

use super::cache::InFlightCache;
use super::language_pair::{LanguagePair, TranslationKey};

/// Snapshot of cache sizes and hit counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Session entries, pending or resolved
    pub sessions: usize,
    /// Translation entries, pending or resolved
    pub translations: usize,
    /// Requests served by an existing entry
    pub hits: usize,
    /// Requests that started provider work
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of requests served by an existing entry
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Owns the session and translation caches for one provider
pub struct SessionManager<P: TranslationProvider> {
    // @field: Capability used on cache miss
    provider: Arc<P>,

    // @field: Pair key -> session
    sessions: InFlightCache<String, Arc<P::Session>>,

    // @field: (pair key, text) -> translated text
    translations: InFlightCache<TranslationKey, String>,
}

impl<P: TranslationProvider> SessionManager<P> {
    /// Create a manager that owns `provider`
    pub fn new(provider: P) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Create a manager around a provider that is also held elsewhere
    pub fn from_arc(provider: Arc<P>) -> Self {
        Self {
            provider,
            sessions: InFlightCache::new("session"),
            translations: InFlightCache::new("translation"),
        }
    }

    /// The underlying provider
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Get the session for `pair`, creating it on first request.
    ///
    /// Concurrent callers for the same pair share a single `create_session`
    /// call and all observe its outcome. A failed creation stays failed.
    pub async fn get_session(&self, pair: &LanguagePair) -> Result<Arc<P::Session>, I18nError> {
        let outcome = self.sessions.get_or_start(pair.cache_key(), || {
            let provider = Arc::clone(&self.provider);
            let pair = pair.clone();
            async move {
                info!("Initializing {} translation session for {}", provider.name(), pair);
                match provider.create_session(&pair).await {
                    Ok(session) => Ok(Arc::new(session)),
                    Err(e) => {
                        warn!("Translation session for {} failed: {}", pair, e);
                        Err(e)
                    }
                }
            }
        });

        outcome.await
    }

    /// Translate `text` from the pair's source language to its target language.
    ///
    /// The session is obtained through `get_session`. The result for a given
    /// `(pair, text)` is computed once; concurrent and later callers receive
    /// the same outcome without another provider call.
    pub async fn translate(&self, pair: &LanguagePair, text: &str) -> Result<String, I18nError> {
        let session = self.get_session(pair).await?;

        let outcome = self.translations.get_or_start(pair.translation_key(text), || {
            let provider = Arc::clone(&self.provider);
            let text = text.to_string();
            async move {
                debug!("Requesting {} translation ({} chars)", provider.name(), text.chars().count());
                provider.translate(&session, &text).await
            }
        });

        outcome.await
    }

    /// Current cache sizes and counters
    pub fn stats(&self) -> CacheStats {
        let (session_hits, session_misses) = self.sessions.counters();
        let (translation_hits, translation_misses) = self.translations.counters();

        CacheStats {
            sessions: self.sessions.len(),
            translations: self.translations.len(),
            hits: session_hits + translation_hits,
            misses: session_misses + translation_misses,
        }
    }
}
