/*!
 * Scoped consumption layer.
 *
 * `provide` binds a language pair and a `SessionManager` to everything the
 * given future awaits, the way a context provider binds a value to a render
 * subtree. Inside, `use_translation` returns a `Translator` for the nearest
 * enclosing binding. The layer keeps no cache of its own: every call goes to
 * the manager, whose deduplication guarantees no duplicate work is issued.
 *
 * Bindings are task-local. A task spawned from inside a scope does not
 * inherit it; wrap the spawned future in its own `provide` call.
 */

use futures::future::{BoxFuture, FutureExt};
use log::debug;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::errors::I18nError;
use crate::providers::TranslationProvider;

use super::language_pair::LanguagePair;
use super::manager::SessionManager;

/// A language pair bound to a manager, with the provider type erased
trait Binding: Send + Sync {
    fn pair(&self) -> &LanguagePair;
    fn translate(&self, text: String) -> BoxFuture<'static, Result<String, I18nError>>;
}

struct ManagerBinding<P: TranslationProvider> {
    manager: Arc<SessionManager<P>>,
    pair: LanguagePair,
}

impl<P: TranslationProvider> Binding for ManagerBinding<P> {
    fn pair(&self) -> &LanguagePair {
        &self.pair
    }

    fn translate(&self, text: String) -> BoxFuture<'static, Result<String, I18nError>> {
        let manager = Arc::clone(&self.manager);
        let pair = self.pair.clone();
        async move { manager.translate(&pair, &text).await }.boxed()
    }
}

tokio::task_local! {
    static CURRENT: Arc<dyn Binding>;
}

/// Run `body` with `pair` as the enclosing translation configuration.
///
/// The session for `pair` is initialized first; if that fails, `body` is never
/// run and the session error is returned.
pub async fn provide<P, F>(manager: Arc<SessionManager<P>>, pair: LanguagePair, body: F) -> Result<F::Output, I18nError>
where
    P: TranslationProvider,
    F: Future,
{
    manager.get_session(&pair).await?;
    debug!("Entering translation scope for {}", pair);

    let binding: Arc<dyn Binding> = Arc::new(ManagerBinding { manager, pair });
    Ok(CURRENT.scope(binding, body).await)
}

/// Translator bound to the nearest enclosing `provide` call.
///
/// Fails with `MissingProviderContext` when called outside any scope.
pub fn use_translation() -> Result<Translator, I18nError> {
    CURRENT
        .try_with(|binding| Translator {
            binding: Arc::clone(binding),
        })
        .map_err(|_| I18nError::MissingProviderContext)
}

/// Obtain the enclosing translator and hand it to `render`
pub async fn translation<F, Fut>(render: F) -> Result<Fut::Output, I18nError>
where
    F: FnOnce(Translator) -> Fut,
    Fut: Future,
{
    let translator = use_translation()?;
    Ok(render(translator).await)
}

/// Translate function handed to consumer code
#[derive(Clone)]
pub struct Translator {
    binding: Arc<dyn Binding>,
}

impl Translator {
    /// Translate `text` (anything displayable, numbers included)
    pub async fn t(&self, text: impl ToString) -> Result<String, I18nError> {
        self.binding.translate(text.to_string()).await
    }

    /// Pair this translator is bound to
    pub fn pair(&self) -> &LanguagePair {
        self.binding.pair()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator").field("pair", self.pair()).finish()
    }
}
