/*!
 * Tests for session and translation caching in SessionManager
 */

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use locali18n::providers::mock::MockProvider;
use locali18n::{I18nError, SessionManager};

use crate::common::mock_providers::{GateOutcome, GatedProvider};
use crate::common::{self, DEMO_TEXT};

const CALLERS: usize = 16;

fn gated_manager(provider: GatedProvider) -> (Arc<GatedProvider>, Arc<SessionManager<GatedProvider>>) {
    let provider = Arc::new(provider);
    let manager = Arc::new(SessionManager::from_arc(Arc::clone(&provider)));
    (provider, manager)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_getSession_withConcurrentCallers_shouldCreateOnceAndShareSession() {
    common::init_logging();
    let (provider, manager) = gated_manager(GatedProvider::new());
    let pair = common::pair("en", "es");

    let mut callers = JoinSet::new();
    for _ in 0..CALLERS {
        let manager = Arc::clone(&manager);
        let pair = pair.clone();
        callers.spawn(async move { manager.get_session(&pair).await });
    }

    common::wait_until(|| provider.session_calls() == 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(provider.session_calls(), 1);

    provider.open_sessions();

    let mut sessions = Vec::new();
    while let Some(joined) = common::within_a_second(callers.join_next()).await {
        sessions.push(joined.unwrap().unwrap());
    }

    assert_eq!(sessions.len(), CALLERS);
    assert!(sessions.iter().all(|session| Arc::ptr_eq(session, &sessions[0])));
    assert_eq!(sessions[0].serial, 1);
    assert_eq!(provider.session_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_getSession_withConcurrentCallersAndFailure_shouldShareFailure() {
    let (provider, manager) = gated_manager(GatedProvider::with_outcomes(GateOutcome::Fail, GateOutcome::Succeed));
    let pair = common::pair("en", "es");

    let mut callers = JoinSet::new();
    for _ in 0..CALLERS {
        let manager = Arc::clone(&manager);
        let pair = pair.clone();
        callers.spawn(async move { manager.get_session(&pair).await.map(|_| ()) });
    }

    common::wait_until(|| provider.session_calls() == 1).await;
    provider.open_sessions();

    let expected = Err(I18nError::session_creation_failed(&pair, "gate refused"));
    while let Some(joined) = common::within_a_second(callers.join_next()).await {
        assert_eq!(joined.unwrap(), expected);
    }
    assert_eq!(provider.session_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_translate_withConcurrentCallers_shouldCallProviderOnce() {
    let (provider, manager) = gated_manager(GatedProvider::new());
    provider.open_sessions();
    let pair = common::pair("en", "es");

    let mut callers = JoinSet::new();
    for _ in 0..CALLERS {
        let manager = Arc::clone(&manager);
        let pair = pair.clone();
        callers.spawn(async move { manager.translate(&pair, "hi").await });
    }

    common::wait_until(|| provider.translate_calls() == 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(provider.translate_calls(), 1);

    provider.open_translations();

    while let Some(joined) = common::within_a_second(callers.join_next()).await {
        assert_eq!(joined.unwrap(), Ok("es(hi)".to_string()));
    }
    assert_eq!(provider.translate_calls(), 1);
    assert_eq!(provider.session_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_translate_withConcurrentCallersAndRejection_shouldShareFailure() {
    let (provider, manager) = gated_manager(GatedProvider::with_outcomes(GateOutcome::Succeed, GateOutcome::Fail));
    provider.open_sessions();
    let pair = common::pair("en", "es");

    let mut callers = JoinSet::new();
    for _ in 0..CALLERS {
        let manager = Arc::clone(&manager);
        let pair = pair.clone();
        callers.spawn(async move { manager.translate(&pair, "hi").await });
    }

    common::wait_until(|| provider.translate_calls() == 1).await;
    provider.open_translations();

    let expected = Err(I18nError::translation_failed(&pair, "hi", "gate refused"));
    while let Some(joined) = common::within_a_second(callers.join_next()).await {
        assert_eq!(joined.unwrap(), expected);
    }
    assert_eq!(provider.translate_calls(), 1);
}

#[tokio::test]
async fn test_translate_afterResolution_shouldServeFromCache() {
    let manager = SessionManager::new(MockProvider::working());
    let pair = common::pair("en", "es");

    let first = manager.translate(&pair, DEMO_TEXT).await.unwrap();
    let second = manager.translate(&pair, DEMO_TEXT).await.unwrap();

    assert_eq!(first, format!("[es] {}", DEMO_TEXT));
    assert_eq!(second, first);
    assert_eq!(manager.provider().translate_calls(), 1);
    assert_eq!(manager.provider().received_texts(), vec![DEMO_TEXT.to_string()]);
}

#[tokio::test]
async fn test_translate_withDifferentTargets_shouldUseSeparateEntries() {
    let manager = SessionManager::new(MockProvider::working());

    let spanish = manager.translate(&common::pair("en", "es"), "hi").await.unwrap();
    let french = manager.translate(&common::pair("en", "fr"), "hi").await.unwrap();

    assert_eq!(spanish, "[es] hi");
    assert_eq!(french, "[fr] hi");
    assert_eq!(manager.provider().session_calls(), 2);
    assert_eq!(manager.provider().translate_calls(), 2);
    assert_eq!(manager.stats().translations, 2);
}

#[tokio::test]
async fn test_translate_withSeparatelyBuiltEqualPairs_shouldShareEntries() {
    let manager = SessionManager::new(MockProvider::working());
    let config_a = common::pair("en", "es");
    let config_b = common::pair(&String::from("en"), &String::from("es"));

    manager.translate(&config_a, "hi").await.unwrap();
    manager.translate(&config_b, "hi").await.unwrap();

    assert_eq!(manager.provider().session_calls(), 1);
    assert_eq!(manager.provider().translate_calls(), 1);
}

#[tokio::test]
async fn test_getSession_afterFailure_shouldNotRetry() {
    let manager = SessionManager::new(MockProvider::unsupported_pair());
    let pair = common::pair("en", "es");

    let first = manager.get_session(&pair).await.map(|_| ());
    let second = manager.get_session(&pair).await.map(|_| ());

    assert!(matches!(first, Err(I18nError::SessionCreationFailed { .. })));
    assert_eq!(first, second);
    assert_eq!(manager.provider().session_calls(), 1);
}

#[tokio::test]
async fn test_translate_afterRejection_shouldNotRetry() {
    let manager = SessionManager::new(MockProvider::rejecting());
    let pair = common::pair("en", "es");

    let first = manager.translate(&pair, "hi").await;
    let second = manager.translate(&pair, "hi").await;

    assert!(matches!(first, Err(I18nError::TranslationFailed { .. })));
    assert_eq!(first, second);
    assert_eq!(manager.provider().translate_calls(), 1);
}

#[tokio::test]
async fn test_translate_withEmptyAndUnicodeText_shouldCacheEachExactly() {
    let manager = SessionManager::new(MockProvider::working());
    let pair = common::pair("ja", "fr");

    assert_eq!(manager.translate(&pair, "").await.unwrap(), "[fr] ");
    assert_eq!(manager.translate(&pair, "こんにちは").await.unwrap(), "[fr] こんにちは");
    assert_eq!(manager.translate(&pair, "こんにちは ").await.unwrap(), "[fr] こんにちは ");
    assert_eq!(manager.provider().translate_calls(), 3);
}

#[tokio::test]
async fn test_managers_shouldNotShareCaches() {
    let provider = Arc::new(MockProvider::working());
    let first = SessionManager::from_arc(Arc::clone(&provider));
    let second = SessionManager::from_arc(Arc::clone(&provider));
    let pair = common::pair("en", "es");

    first.translate(&pair, "hi").await.unwrap();
    second.translate(&pair, "hi").await.unwrap();

    assert_eq!(provider.translate_calls(), 2);
}
