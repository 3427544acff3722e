/*!
 * Mock provider for tests, benches and offline demos.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with a tagged pseudo-translation
 * - `MockProvider::unsupported_pair()` - Refuses to create sessions
 * - `MockProvider::rejecting()` - Creates sessions but rejects every translation
 * - `MockProvider::slow(ms)` - Succeeds after a delay on both operations
 *
 * Calls are counted so tests can check how many times the capability was hit.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::I18nError;
use crate::providers::TranslationProvider;
use crate::translation::language_pair::LanguagePair;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Session creation is rejected for every pair
    UnsupportedPair,
    /// Sessions open, every translation is rejected
    RejectTranslations,
    /// Succeeds after sleeping on each call
    Slow { delay_ms: u64 },
}

/// Session opened by the mock provider
#[derive(Debug, Clone, PartialEq)]
pub struct MockSession {
    /// Pair the session was opened for
    pub pair: LanguagePair,
    /// Sequence number of the `create_session` call that produced it
    pub serial: usize,
}

/// Mock provider for testing caching and deduplication
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `create_session` calls
    session_calls: Arc<AtomicUsize>,
    /// Number of `translate` calls
    translate_calls: Arc<AtomicUsize>,
    /// Inputs received by `translate`, in call order
    received: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&LanguagePair, &str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            session_calls: Arc::new(AtomicUsize::new(0)),
            translate_calls: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn unsupported_pair() -> Self {
        Self::new(MockBehavior::UnsupportedPair)
    }

    pub fn rejecting() -> Self {
        Self::new(MockBehavior::RejectTranslations)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&LanguagePair, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of sessions requested so far
    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    /// Number of translations requested so far
    pub fn translate_calls(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    /// Texts passed to `translate`, in call order
    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    /// Default pseudo-translation: the text tagged with the target language
    pub fn pseudo_translate(pair: &LanguagePair, text: &str) -> String {
        format!("[{}] {}", pair.target_language(), text)
    }

    async fn pause(&self) {
        if let MockBehavior::Slow { delay_ms } = self.behavior {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            session_calls: Arc::clone(&self.session_calls),
            translate_calls: Arc::clone(&self.translate_calls),
            received: Arc::clone(&self.received),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    type Session = MockSession;

    fn name(&self) -> &str {
        "mock"
    }

    async fn create_session(&self, pair: &LanguagePair) -> Result<Self::Session, I18nError> {
        let serial = self.session_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.pause().await;

        match self.behavior {
            MockBehavior::UnsupportedPair => Err(I18nError::session_creation_failed(
                pair,
                "Simulated unsupported language pair",
            )),
            _ => Ok(MockSession {
                pair: pair.clone(),
                serial,
            }),
        }
    }

    async fn translate(&self, session: &Self::Session, text: &str) -> Result<String, I18nError> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(text.to_string());
        self.pause().await;

        match self.behavior {
            MockBehavior::RejectTranslations => Err(I18nError::translation_failed(
                &session.pair,
                text,
                "Simulated translation rejection",
            )),
            _ => {
                let generator = self.custom_response.unwrap_or(Self::pseudo_translate);
                Ok(generator(&session.pair, text))
            }
        }
    }
}
