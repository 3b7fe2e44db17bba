/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::query
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Per-session keyed cache for asynchronous footer sources.
    Each key is fetched at most once per session; concurrent
    callers share the in-flight request and its outcome.

  Security / Safety Notes:
    Holds only public display data. Nothing crosses session
    boundaries: a new session starts with an empty cache.

  Dependencies:
    tokio::sync::OnceCell for single-flight initialisation.

  Operational Scope:
    Backs the backend version query and the custom links
    loader.

  Revision History:
    2026-10-16 COD  Authored session query cache.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Observable pending / value / error states
    - Failures cached for the session, never retried silently
============================================================*/

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::error::SourceError;

/// Cache key of the backend version query.
pub const BACKEND_VERSION_KEY: &str = "config_backend_version";
/// Cache key prefix of the custom links fetch.
pub const FOOTER_LINKS_KEY: &str = "footer-links";

/// Observable state of one cache key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Never requested in this session.
    Idle,
    /// Requested, no outcome yet.
    Pending,
    Ready(T),
    Failed(SourceError),
}

impl<T> QueryState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SourceError> {
        match self {
            QueryState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<std::result::Result<T, SourceError>> for QueryState<T> {
    fn from(outcome: std::result::Result<T, SourceError>) -> Self {
        match outcome {
            Ok(value) => QueryState::Ready(value),
            Err(err) => QueryState::Failed(err),
        }
    }
}

struct Entry<T> {
    requested: AtomicBool,
    outcome: OnceCell<std::result::Result<T, SourceError>>,
}

impl<T> Entry<T> {
    fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
            outcome: OnceCell::new(),
        }
    }
}

/// Keyed, never-stale cache scoped to one session.
pub struct QueryCache<T> {
    entries: Mutex<HashMap<String, Arc<Entry<T>>>>,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &str) -> Arc<Entry<T>> {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Entry::new()))
            .clone()
    }

    /// Resolve `key`, running `fetch` only if no outcome is cached and no
    /// other caller is already fetching it. Success and failure are both
    /// kept for the rest of the session.
    ///
    /// Dropping the returned future before it completes abandons the fetch
    /// without writing anything; the key then reads as `Pending` and the next
    /// caller starts over.
    pub async fn fetch<F, Fut>(&self, key: &str, fetch: F) -> std::result::Result<T, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, SourceError>>,
    {
        let entry = self.entry(key);
        entry.requested.store(true, Ordering::SeqCst);
        entry.outcome.get_or_init(fetch).await.clone()
    }

    /// Non-blocking snapshot of `key`.
    pub fn state(&self, key: &str) -> QueryState<T> {
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(entry) = entries.get(key) else {
            return QueryState::Idle;
        };
        match entry.outcome.get() {
            Some(outcome) => outcome.clone().into(),
            None if entry.requested.load(Ordering::SeqCst) => QueryState::Pending,
            None => QueryState::Idle,
        }
    }
}
