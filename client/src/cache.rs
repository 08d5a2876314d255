//! Keyed query cache with staleness tracking and refetch coalescing.
//!
//! # Design
//! Each key owns one entry moving through a small state machine:
//!
//! ```text
//! Empty -> Loading -> Fresh <-> Stale -> Loading -> Fresh | Error
//! ```
//!
//! `read` returns a `watch` subscription to the entry's `ReadResult` and, if
//! the entry is not fresh, spawns at most one fetch task; reads arriving
//! while a fetch is in flight observe the same task instead of starting a
//! second one. `invalidate` only clears freshness — the next `read` does the
//! refetching. A fetch failure keeps previously cached data visible next to
//! the error flag so consumers can keep rendering stale data instead of
//! blanking.
//!
//! An invalidation that lands while a fetch is in flight does not discard
//! that fetch's result: the result is accepted and published, and the entry
//! settles as stale so the next read refetches. The staleness window is at
//! most one round trip and no retroactive fetch is forced.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::error::ApiError;

/// Logical cache key. Only one entity kind exists today; the enum keeps the
/// invalidation protocol reusable if more are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Products,
}

/// Snapshot of a cache entry as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResult<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<String>,
}

impl<T> ReadResult<T> {
    fn empty() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_error: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Empty,
    Loading,
    Fresh,
    Stale,
    Error,
}

struct Entry<T> {
    state: EntryState,
    data: Option<T>,
    error: Option<String>,
    invalidated_in_flight: bool,
    tx: watch::Sender<ReadResult<T>>,
}

impl<T: Clone> Entry<T> {
    fn new() -> Self {
        let (tx, _) = watch::channel(ReadResult::empty());
        Self {
            state: EntryState::Empty,
            data: None,
            error: None,
            invalidated_in_flight: false,
            tx,
        }
    }

    fn publish(&self) {
        // send_replace stores the snapshot even with no receivers alive, so
        // a later subscriber starts from the entry's settled state.
        self.tx.send_replace(ReadResult {
            data: self.data.clone(),
            is_loading: self.state == EntryState::Loading,
            is_error: self.state == EntryState::Error,
            error: if self.state == EntryState::Error {
                self.error.clone()
            } else {
                None
            },
        });
    }
}

type Entries<T> = Mutex<HashMap<QueryKey, Entry<T>>>;

pub struct QueryCache<T> {
    entries: Arc<Entries<T>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Subscribe to `key`. If the entry is fresh the subscription already
    /// holds the cached data and no fetch happens; if a fetch is in flight
    /// the subscription observes it; otherwise exactly one fetch task is
    /// spawned and `fetch` is consumed. When coalescing onto an in-flight
    /// fetch, the passed future is dropped unpolled.
    pub fn read<F>(&self, key: QueryKey, fetch: F) -> watch::Receiver<ReadResult<T>>
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key).or_insert_with(Entry::new);
        let rx = entry.tx.subscribe();

        match entry.state {
            EntryState::Fresh | EntryState::Loading => rx,
            EntryState::Empty | EntryState::Stale | EntryState::Error => {
                debug!(?key, from = ?entry.state, "spawning fetch");
                entry.state = EntryState::Loading;
                entry.publish();

                let entries = Arc::clone(&self.entries);
                tokio::spawn(async move {
                    let result = fetch.await;
                    settle(&entries, key, result);
                });
                rx
            }
        }
    }

    /// Mark `key` stale. Idempotent, never fetches, and keeps the current
    /// data visible. While a fetch is in flight this only notes that a new
    /// invalidation arrived; the in-flight result is still accepted.
    pub fn invalidate(&self, key: QueryKey) {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(&key) else {
            return;
        };
        match entry.state {
            EntryState::Loading => entry.invalidated_in_flight = true,
            EntryState::Fresh => {
                debug!(?key, "entry invalidated");
                entry.state = EntryState::Stale;
            }
            // Empty, Stale and Error already refetch on the next read.
            EntryState::Empty | EntryState::Stale | EntryState::Error => {}
        }
    }

    /// Current snapshot for `key` without subscribing or fetching.
    pub fn peek(&self, key: QueryKey) -> Option<ReadResult<T>> {
        let entries = self.entries.lock();
        entries.get(&key).map(|entry| entry.tx.borrow().clone())
    }
}

fn settle<T: Clone>(entries: &Entries<T>, key: QueryKey, result: Result<T, ApiError>) {
    let mut entries = entries.lock();
    let Some(entry) = entries.get_mut(&key) else {
        return;
    };
    match result {
        Ok(data) => {
            entry.data = Some(data);
            entry.error = None;
            entry.state = if entry.invalidated_in_flight {
                EntryState::Stale
            } else {
                EntryState::Fresh
            };
        }
        Err(err) => {
            debug!(?key, %err, "fetch failed");
            // Keep the old data: consumers show it alongside the error flag.
            entry.error = Some(err.to_string());
            entry.state = EntryState::Error;
        }
    }
    entry.invalidated_in_flight = false;
    entry.publish();
}
