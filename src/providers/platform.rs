/*!
 * Adapter to the platform translation capability.
 *
 * The host environment (an embedding application, a browser bridge, an OS
 * service binding) installs its translator once with `install`. The provider
 * never reads that slot directly: it asks a capability check, `detect` by
 * default, which answers present or absent. Tests and alternate hosts can
 * supply their own check with `PlatformProvider::with_capability_check`.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::errors::I18nError;
use crate::providers::TranslationProvider;
use crate::translation::language_pair::LanguagePair;

/// Path reported when no platform translator is installed
pub const TRANSLATOR_CAPABILITY: &str = "platform.translator.create";

/// The platform's session factory
#[async_trait]
pub trait PlatformTranslator: Send + Sync {
    /// Instantiate a session for `pair`
    async fn create(&self, pair: &LanguagePair) -> anyhow::Result<Box<dyn PlatformSession>>;
}

/// A platform session bound to one language pair
#[async_trait]
pub trait PlatformSession: Send + Sync {
    async fn translate(&self, text: &str) -> anyhow::Result<String>;
}

/// Result of a capability check
#[derive(Clone)]
pub enum Capability {
    Present(Arc<dyn PlatformTranslator>),
    Absent,
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(_) => f.write_str("Present"),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// Function deciding whether the capability is available right now
pub type CapabilityCheck = Arc<dyn Fn() -> Capability + Send + Sync>;

static INSTALLED: Lazy<RwLock<Option<Arc<dyn PlatformTranslator>>>> = Lazy::new(|| RwLock::new(None));

/// Install the process-wide platform translator, returning the previous one
pub fn install(translator: Arc<dyn PlatformTranslator>) -> Option<Arc<dyn PlatformTranslator>> {
    info!("Platform translator installed");
    INSTALLED.write().replace(translator)
}

/// Remove the process-wide platform translator
pub fn uninstall() -> Option<Arc<dyn PlatformTranslator>> {
    INSTALLED.write().take()
}

/// Default capability check: whatever is currently installed
pub fn detect() -> Capability {
    match INSTALLED.read().as_ref() {
        Some(translator) => Capability::Present(Arc::clone(translator)),
        None => Capability::Absent,
    }
}

/// Session returned by `PlatformProvider`
pub struct PlatformTranslationSession {
    pair: LanguagePair,
    inner: Box<dyn PlatformSession>,
}

impl PlatformTranslationSession {
    pub fn pair(&self) -> &LanguagePair {
        &self.pair
    }
}

/// Provider backed by the platform translation capability
pub struct PlatformProvider {
    check: CapabilityCheck,
}

impl PlatformProvider {
    /// Provider that uses the process-wide installed translator
    pub fn new() -> Self {
        Self::with_capability_check(Arc::new(detect))
    }

    /// Provider that uses a custom capability check
    pub fn with_capability_check(check: CapabilityCheck) -> Self {
        Self { check }
    }

    /// Provider bound to a fixed translator, bypassing the process-wide slot
    pub fn with_translator(translator: Arc<dyn PlatformTranslator>) -> Self {
        Self::with_capability_check(Arc::new(move || Capability::Present(Arc::clone(&translator))))
    }

    /// Whether the capability is present right now
    pub fn is_available(&self) -> bool {
        matches!((self.check)(), Capability::Present(_))
    }
}

impl Default for PlatformProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlatformProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformProvider")
            .field("available", &self.is_available())
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for PlatformProvider {
    type Session = PlatformTranslationSession;

    fn name(&self) -> &str {
        "platform"
    }

    async fn create_session(&self, pair: &LanguagePair) -> Result<Self::Session, I18nError> {
        let translator = match (self.check)() {
            Capability::Present(translator) => translator,
            Capability::Absent => {
                warn!("Platform translator unavailable, cannot open session for {}", pair);
                return Err(I18nError::CapabilityUnavailable {
                    capability: TRANSLATOR_CAPABILITY.to_string(),
                });
            }
        };

        debug!("Creating platform translation session for {}", pair);
        let inner = translator
            .create(pair)
            .await
            .map_err(|e| I18nError::session_creation_failed(pair, format!("{:#}", e)))?;

        Ok(PlatformTranslationSession {
            pair: pair.clone(),
            inner,
        })
    }

    async fn translate(&self, session: &Self::Session, text: &str) -> Result<String, I18nError> {
        session
            .inner
            .translate(text)
            .await
            .map_err(|e| I18nError::translation_failed(&session.pair, text, format!("{:#}", e)))
    }
}
