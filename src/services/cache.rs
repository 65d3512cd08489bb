//! Resource Cache
//!
//! Client-side cache of resource blobs keyed by language and group.
//! Created once per session and injected into every translation handle.
//!
//! ## Invariants
//!
//! - At most one underlying load is in flight per key; concurrent callers
//!   share it.
//! - Settled entries are kept until explicitly evicted.
//! - A failed load settles as `Failed(empty blob)` and is not retried while
//!   it stays cached.

use crate::i18n::{Language, ResourceBlob};
use crate::services::loader::{ResourceLoader, default_group};
use crate::services::runtime::spawn_in_tokio;
use ahash::AHashMap;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cache key: language plus resource group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub language: Language,
    pub group: Arc<str>,
}

impl CacheKey {
    /// Build a key; a missing group means the language's default file
    pub fn new(language: Language, group: Option<&str>) -> Self {
        Self {
            language,
            group: default_group(language, group).into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.language, self.group)
    }
}

/// Loading state of one cache entry
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Load not finished; dependent views should wait
    Pending,
    /// Blob loaded
    Ready(ResourceBlob),
    /// Load failed; carries the empty fallback blob
    Failed(ResourceBlob),
}

impl LoadState {
    /// Blob usable for translation, once settled
    pub fn blob(&self) -> Option<&ResourceBlob> {
        match self {
            LoadState::Pending => None,
            LoadState::Ready(blob) | LoadState::Failed(blob) => Some(blob),
        }
    }

    /// Owned blob, empty while pending
    pub fn into_blob(self) -> ResourceBlob {
        match self {
            LoadState::Pending => ResourceBlob::empty(),
            LoadState::Ready(blob) | LoadState::Failed(blob) => blob,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

type SharedLoad = Shared<BoxFuture<'static, LoadState>>;

enum CacheEntry {
    InFlight { id: usize, load: SharedLoad },
    Settled(LoadState),
}

enum Lookup {
    Settled(LoadState),
    InFlight { id: usize, load: SharedLoad },
}

struct CacheInner {
    loader: Arc<dyn ResourceLoader>,
    entries: Mutex<AHashMap<CacheKey, CacheEntry>>,
    loads: AtomicUsize,
}

/// Shared cache of resource blobs
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<CacheInner>,
}

impl ResourceCache {
    /// Create a cache backed by `loader`
    pub fn new(loader: impl ResourceLoader) -> Self {
        Self::with_loader(Arc::new(loader))
    }

    /// Create a cache backed by a shared loader
    pub fn with_loader(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                loader,
                entries: Mutex::new(AHashMap::new()),
                loads: AtomicUsize::new(0),
            }),
        }
    }

    /// Wait for the blob of `key`, starting the load if needed
    pub async fn load(&self, key: &CacheKey) -> ResourceBlob {
        match self.acquire(key) {
            Lookup::Settled(state) => state.into_blob(),
            Lookup::InFlight { id, load } => {
                let state = load.await;
                self.settle(key, id, state.clone());
                state.into_blob()
            }
        }
    }

    /// Non-blocking access: start the load if absent and report its state
    pub fn request(&self, key: &CacheKey) -> LoadState {
        match self.acquire(key) {
            Lookup::Settled(state) => state,
            Lookup::InFlight { id, load } => match load.peek() {
                Some(state) => {
                    let state = state.clone();
                    self.settle(key, id, state.clone());
                    state
                }
                None => LoadState::Pending,
            },
        }
    }

    /// Peek at the state of `key` without starting a load
    pub fn state(&self, key: &CacheKey) -> LoadState {
        match self.inner.entries.lock().get(key) {
            Some(CacheEntry::Settled(state)) => state.clone(),
            Some(CacheEntry::InFlight { load, .. }) => {
                load.peek().cloned().unwrap_or(LoadState::Pending)
            }
            None => LoadState::Pending,
        }
    }

    /// Drop the entry for `key`; the next access loads again
    pub fn evict(&self, key: &CacheKey) -> bool {
        let removed = self.inner.entries.lock().remove(key).is_some();
        if removed {
            tracing::debug!(key = %key, "Evicted resource");
        }
        removed
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.entries.lock().clear();
    }

    /// Number of cached entries, settled or in flight
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of underlying loads started so far
    pub fn load_count(&self) -> usize {
        self.inner.loads.load(Ordering::SeqCst)
    }

    fn acquire(&self, key: &CacheKey) -> Lookup {
        let mut entries = self.inner.entries.lock();
        match entries.get(key) {
            Some(CacheEntry::Settled(state)) => Lookup::Settled(state.clone()),
            Some(CacheEntry::InFlight { id, load }) => Lookup::InFlight {
                id: *id,
                load: load.clone(),
            },
            None => {
                let (id, load) = self.start(key);
                entries.insert(
                    key.clone(),
                    CacheEntry::InFlight {
                        id,
                        load: load.clone(),
                    },
                );
                Lookup::InFlight { id, load }
            }
        }
    }

    /// Start the single load for `key` and drive it in the background so it
    /// completes even if every waiter goes away.
    fn start(&self, key: &CacheKey) -> (usize, SharedLoad) {
        let id = self.inner.loads.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(key = %key, "Loading resource");

        let loader = self.inner.loader.clone();
        let language = key.language;
        let group = key.group.clone();
        let load = async move {
            match loader.load(language, &group).await {
                Ok(blob) => {
                    tracing::debug!(language = %language, group = %group, "Resource loaded");
                    LoadState::Ready(blob)
                }
                Err(e) => {
                    tracing::warn!(
                        language = %language,
                        group = %group,
                        error = %e,
                        "Resource load failed, using empty translations"
                    );
                    LoadState::Failed(ResourceBlob::empty())
                }
            }
        }
        .boxed()
        .shared();

        let cache = self.clone();
        let driver = load.clone();
        let key = key.clone();
        spawn_in_tokio(async move {
            let state = driver.await;
            cache.settle(&key, id, state);
        });

        (id, load)
    }

    /// Record the outcome of load `id`. Evicted entries stay evicted and a
    /// newer load for the same key is left alone.
    fn settle(&self, key: &CacheKey, id: usize, state: LoadState) {
        let mut entries = self.inner.entries.lock();
        if let Some(entry) = entries.get_mut(key) {
            if matches!(entry, CacheEntry::InFlight { id: current, .. } if *current == id) {
                *entry = CacheEntry::Settled(state);
            }
        }
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("entries", &self.len())
            .field("loads", &self.load_count())
            .finish()
    }
}
