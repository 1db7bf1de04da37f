//! Memoization.
//!
//! Two kinds of cache live here:
//!
//! * [`Caches`]: cross-call caches owned by a client session. Keys:
//!
//!   | Cache         | Key                       | Value                  |
//!   |---------------|---------------------------|------------------------|
//!   | `search`      | full `search2` [`Query`]  | `Arc<SearchResults>`   |
//!   | `album_lists` | full `getAlbumList` query | `Arc<Vec<Album>>`      |
//!   | `albums`      | album id                  | `Arc<Album>`           |
//!   | `playlists`   | playlist id               | `Arc<Playlist>`        |
//!   | `cover_art`   | server coverArt id        | [`CoverArt`]           |
//!
//!   Cover art is keyed by the art id, not by the owning album or song, so
//!   every object that shares an art id shares one fetch.
//!
//! * [`Memo`]: a single lazily computed value (an album's song list, a
//!   client's folder map).
//!
//! Both coalesce concurrent first loads: while one caller is fetching a key,
//! other callers asking for the same key wait for that fetch instead of
//! starting their own. Failed loads are never stored.

use crate::error::Result;
use crate::model::{Album, CoverArt, Playlist, SearchResults};
use crate::query::Query;
use moka::sync::Cache;
use parking_lot::Mutex;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::trace;

/// Eviction policy for [`Caches`].
///
/// The default keeps every entry for the life of the client (no size bound,
/// no expiry). Long-running processes that need fresher data or bounded
/// memory can set either limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries per cache.
    pub max_capacity: Option<u64>,
    /// Entries older than this are dropped and refetched on next use.
    pub time_to_live: Option<Duration>,
}

impl CacheConfig {
    #[must_use]
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    #[must_use]
    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    fn build<K, V>(&self) -> Cache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mut builder = Cache::builder();
        if let Some(cap) = self.max_capacity {
            builder = builder.max_capacity(cap);
        }
        if let Some(ttl) = self.time_to_live {
            builder = builder.time_to_live(ttl);
        }
        builder.build()
    }
}

/// Per-session result caches.
pub struct Caches {
    pub(crate) search: Cache<Query, Arc<SearchResults>>,
    pub(crate) album_lists: Cache<Query, Arc<Vec<Album>>>,
    pub(crate) albums: Cache<String, Arc<Album>>,
    pub(crate) playlists: Cache<String, Arc<Playlist>>,
    pub(crate) cover_art: Cache<String, CoverArt>,
}

impl Caches {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            search: config.build(),
            album_lists: config.build(),
            albums: config.build(),
            playlists: config.build(),
            cover_art: config.build(),
        }
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.search.invalidate_all();
        self.album_lists.invalidate_all();
        self.albums.invalidate_all();
        self.playlists.invalidate_all();
        self.cover_art.invalidate_all();
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

/// Return the cached value for `key`, or run `load` once and cache its
/// result. Concurrent callers with the same key share one `load`.
pub(crate) fn cached<K, V, F>(cache: &Cache<K, V>, key: K, load: F) -> Result<V>
where
    K: Hash + Eq + fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    F: FnOnce() -> Result<V>,
{
    if let Some(hit) = cache.get(&key) {
        trace!(?key, "cache hit");
        return Ok(hit);
    }
    cache.try_get_with(key, load).map_err(Into::into)
}

/// A value computed at most once, on first successful access.
///
/// The first caller runs the initializer while holding a gate; callers that
/// arrive meanwhile block on the gate and then see the stored value. If the
/// initializer fails nothing is stored and the next access tries again.
pub struct Memo<T> {
    value: OnceLock<T>,
    gate: Mutex<()>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            value: OnceLock::new(),
            gate: Mutex::new(()),
        }
    }

    /// A memo that is already resolved.
    pub fn resolved(value: T) -> Self {
        Self {
            value: OnceLock::from(value),
            gate: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn get_or_try_init<F>(&self, init: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let _guard = self.gate.lock();
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let value = init()?;
        Ok(self.value.get_or_init(|| value))
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<unresolved>)"),
        }
    }
}
