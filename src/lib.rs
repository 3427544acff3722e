/*!
 * # locali18n - on-demand, cached text translation
 *
 * A Rust library that translates UI strings through a pluggable translation
 * capability, creating sessions lazily and caching everything it computes.
 *
 * ## Features
 *
 * - One translation session per language pair, created on first use
 * - One provider call per (language pair, text), however many callers ask
 *   concurrently; later callers are served from cache
 * - Failures are cached like successes and never retried
 * - Scoped consumption API (`provide` / `use_translation`) for UI code
 * - Providers:
 *   - the platform translator installed by the host
 *   - an Ollama server
 *   - a deterministic mock
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `translation`: the core:
 *   - `translation::manager`: `SessionManager`, the two caches
 *   - `translation::cache`: in-flight deduplicating cache
 *   - `translation::scope`: scoped consumption layer
 *   - `translation::language_pair`: language pair and cache keys
 * - `providers`: the `TranslationProvider` trait and its implementations
 * - `app_config`: configuration for the demo binary
 * - `app_controller`: runs a list of texts through a scope
 * - `language_utils`: ISO language code utilities
 * - `errors`: error types
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{I18nError, ProviderError};
pub use providers::TranslationProvider;
pub use translation::{LanguagePair, SessionManager, Translator, provide, use_translation};
