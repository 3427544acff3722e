/*!
 * Tests for the scoped consumption layer
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use locali18n::providers::mock::MockProvider;
use locali18n::translation::translation;
use locali18n::{I18nError, SessionManager, provide, use_translation};

use crate::common::{self, DEMO_TEXT};

fn mock_manager() -> Arc<SessionManager<MockProvider>> {
    Arc::new(SessionManager::new(MockProvider::working()))
}

#[tokio::test]
async fn test_useTranslation_withoutProvider_shouldReportMissingContext() {
    let result = use_translation();
    assert!(matches!(result, Err(I18nError::MissingProviderContext)));
}

#[tokio::test]
async fn test_translation_withoutProvider_shouldNotRunRender() {
    let rendered = AtomicBool::new(false);
    let flag = &rendered;
    let result = translation(|_t| async move { flag.store(true, Ordering::SeqCst) }).await;

    assert_eq!(result.err(), Some(I18nError::MissingProviderContext));
    assert!(!rendered.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_provide_withDemoText_shouldTranslateThroughManager() {
    let manager = mock_manager();

    let rendered = provide(Arc::clone(&manager), common::pair("en", "es"), async {
        let t = use_translation()?;
        let count = t.t(format!("count is {}", 0)).await?;
        let hint = t.t(DEMO_TEXT).await?;
        Ok::<_, I18nError>((count, hint))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(rendered.0, "[es] count is 0");
    assert_eq!(rendered.1, format!("[es] {}", DEMO_TEXT));
    assert_eq!(manager.provider().session_calls(), 1);
}

#[tokio::test]
async fn test_provide_withNestedScopes_shouldUseNearestPair() {
    let manager = mock_manager();

    let (outer_before, inner, outer_after) = provide(Arc::clone(&manager), common::pair("en", "es"), async {
        let before = use_translation()?.t("hi").await?;
        let inner = provide(Arc::clone(&manager), common::pair("en", "fr"), async {
            use_translation()?.t("hi").await
        })
        .await??;
        let after = use_translation()?.t("hi").await?;
        Ok::<_, I18nError>((before, inner, after))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(outer_before, "[es] hi");
    assert_eq!(inner, "[fr] hi");
    assert_eq!(outer_after, "[es] hi");
    assert_eq!(manager.provider().translate_calls(), 2);
}

#[tokio::test]
async fn test_translator_shouldReportBoundPair() {
    let manager = mock_manager();

    let bound = provide(manager, common::pair("de", "it"), async { use_translation().map(|t| t.pair().clone()) })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bound, common::pair("de", "it"));
}

#[tokio::test]
async fn test_translation_withNumber_shouldStringifyBeforeTranslating() {
    let manager = mock_manager();

    let text = provide(Arc::clone(&manager), common::pair("en", "es"), translation(|t| async move { t.t(7).await }))
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(text, "[es] 7");
    assert_eq!(manager.provider().received_texts(), vec!["7".to_string()]);
}

#[tokio::test]
async fn test_provide_withSpawnedTask_shouldNotInheritBinding() {
    let manager = mock_manager();

    let spawned = provide(manager, common::pair("en", "es"), async {
        tokio::spawn(async { use_translation().map(|_| ()) }).await
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(spawned, Err(I18nError::MissingProviderContext));
}

#[tokio::test]
async fn test_translator_clonedIntoSpawnedTask_shouldStillTranslate() {
    let manager = mock_manager();

    let text = provide(Arc::clone(&manager), common::pair("en", "es"), async {
        let t = use_translation()?;
        let handle = tokio::spawn(async move { t.t("hi").await });
        handle.await.map_err(|e| I18nError::TaskInterrupted {
            key: "hi".to_string(),
            reason: e.to_string(),
        })?
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(text, "[es] hi");
}

#[tokio::test]
async fn test_provide_withSharedManager_shouldShareCacheAcrossScopes() {
    let manager = mock_manager();
    let pair = common::pair("en", "es");

    for _ in 0..3 {
        let text = provide(Arc::clone(&manager), pair.clone(), async { use_translation()?.t(DEMO_TEXT).await })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(text, format!("[es] {}", DEMO_TEXT));
    }

    assert_eq!(manager.provider().session_calls(), 1);
    assert_eq!(manager.provider().translate_calls(), 1);
}

#[tokio::test]
async fn test_provide_withRejectingProvider_shouldSurfaceTranslationFailure() {
    let manager = Arc::new(SessionManager::new(MockProvider::rejecting()));

    let result = provide(manager, common::pair("en", "es"), async { use_translation()?.t("hi").await })
        .await
        .unwrap();

    assert!(matches!(result, Err(I18nError::TranslationFailed { .. })));
}

#[test]
fn test_provide_onCurrentThreadRuntime_shouldTranslate() {
    let manager = mock_manager();

    let text = tokio_test::block_on(provide(manager, common::pair("en", "pt-BR"), async {
        use_translation()?.t("hi").await
    }))
    .unwrap()
    .unwrap();

    assert_eq!(text, "[pt-BR] hi");
}
