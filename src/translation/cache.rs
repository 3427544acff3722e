/*!
 * In-flight deduplicating cache.
 *
 * Each key maps to a single shared future. The first caller for a key starts
 * the work; every later caller, whether the work is still running or already
 * finished, receives a clone of the same shared future and therefore the same
 * outcome. Entries are never replaced or removed, failures included.
 */

use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::I18nError;

/// Outcome of one cache entry, shareable between any number of waiters
pub type SharedOutcome<V> = Shared<BoxFuture<'static, Result<V, I18nError>>>;

/// Map from key to the single in-flight-or-resolved computation for that key
pub struct InFlightCache<K, V> {
    /// Name used in log lines
    label: &'static str,

    /// One shared future per key
    entries: Mutex<HashMap<K, SharedOutcome<V>>>,

    /// Requests that found an existing entry
    hits: AtomicUsize,

    /// Requests that had to start the work
    misses: AtomicUsize,
}

impl<K, V> InFlightCache<K, V>
where
    K: Eq + Hash + Clone + Display + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the entry for `key`, starting `start` only if no entry exists.
    ///
    /// Lookup and insertion happen under one lock with no suspension point in
    /// between, so two callers can never both start work for the same key.
    /// Inside a Tokio runtime the work is spawned and runs to completion even
    /// if every waiter goes away; outside one it is driven by its waiters.
    pub fn get_or_start<F, Fut>(&self, key: K, start: F) -> SharedOutcome<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, I18nError>> + Send + 'static,
    {
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("{} cache hit for '{}'", self.label, key);
            return existing.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("{} cache miss for '{}', starting work", self.label, key);

        let outcome = spawn_to_completion(key.to_string(), start()).shared();
        entries.insert(key, outcome.clone());
        outcome
    }

    /// Number of entries, pending or resolved
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Hit and miss counters
    pub fn counters(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }
}

fn spawn_to_completion<V, Fut>(key: String, work: Fut) -> BoxFuture<'static, Result<V, I18nError>>
where
    V: Send + 'static,
    Fut: Future<Output = Result<V, I18nError>> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let task = handle.spawn(work);
            async move {
                task.await.unwrap_or_else(|join_error| {
                    Err(I18nError::TaskInterrupted {
                        key,
                        reason: join_error.to_string(),
                    })
                })
            }
            .boxed()
        }
        Err(_) => work.boxed(),
    }
}
