use futures::future::join_all;
use log::{debug, error, info};
use std::sync::Arc;

use crate::errors::I18nError;
use crate::language_utils;
use crate::providers::TranslationProvider;
use crate::translation::{self, LanguagePair, SessionManager};

// @module: Application controller wiring a manager, a pair and consumer code

/// Runs texts through a translation scope, the way a rendered page would
pub struct Controller<P: TranslationProvider> {
    // @field: Shared session manager
    manager: Arc<SessionManager<P>>,

    // @field: Configured language pair
    pair: LanguagePair,
}

impl<P: TranslationProvider> Controller<P> {
    /// Create a controller with its own session manager
    pub fn new(provider: P, pair: LanguagePair) -> Self {
        Self::with_manager(Arc::new(SessionManager::new(provider)), pair)
    }

    /// Create a controller around an existing session manager
    pub fn with_manager(manager: Arc<SessionManager<P>>, pair: LanguagePair) -> Self {
        Self { manager, pair }
    }

    pub fn manager(&self) -> &Arc<SessionManager<P>> {
        &self.manager
    }

    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    /// Translate every text inside one scope, concurrently.
    ///
    /// Fails as a whole only when the session cannot be initialized; each
    /// text then gets its own outcome, in input order.
    pub async fn run(&self, texts: &[String]) -> Result<Vec<Result<String, I18nError>>, I18nError> {
        info!(
            "Translating {} text(s) from {} to {}",
            texts.len(),
            language_utils::display_name(self.pair.source_language()),
            language_utils::display_name(self.pair.target_language())
        );

        let outcomes = translation::provide(Arc::clone(&self.manager), self.pair.clone(), async {
            translation::translation(|t| async move {
                join_all(texts.iter().map(|text| t.t(text))).await
            })
            .await
        })
        .await??;

        for (text, outcome) in texts.iter().zip(&outcomes) {
            match outcome {
                Ok(_) => debug!("Translated '{}'", crate::errors::excerpt(text)),
                Err(e) => error!("{}", e),
            }
        }

        let stats = self.manager.stats();
        debug!(
            "Cache: {} session(s), {} translation(s), hit rate {:.0}%",
            stats.sessions,
            stats.translations,
            stats.hit_rate() * 100.0
        );

        Ok(outcomes)
    }
}
