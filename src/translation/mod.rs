/*!
 * Cached, deduplicated translation.
 *
 * - `language_pair`: language pair and cache keys
 * - `cache`: in-flight deduplicating cache
 * - `manager`: session and translation caches in front of a provider
 * - `scope`: scoped consumption layer handing out `Translator`s
 */

// Re-export main types for easier usage
pub use self::language_pair::{LanguagePair, TranslationKey};
pub use self::manager::{CacheStats, SessionManager};
pub use self::scope::{Translator, provide, translation, use_translation};

// Submodules
pub mod cache;
pub mod language_pair;
pub mod manager;
pub mod scope;
