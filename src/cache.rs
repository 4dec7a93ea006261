// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::{NodeId, Route};

/// Recommended number of routes kept in a [RouteCache].
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(30).unwrap();

/// Unordered pair of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodePair(NodeId, NodeId);

impl NodePair {
    fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

#[derive(Debug, Clone)]
struct CachedRoute {
    from: NodeId,
    route: Arc<Route>,
}

/// Bounded memo of computed routes, keyed by the unordered pair of their end nodes,
/// evicting the least recently used route once full.
///
/// Every pair of nodes occupies at most one slot. The slot remembers where its route starts,
/// so asking for the reverse direction is a miss, and storing the reverse route replaces
/// the old one.
///
/// The cache can be shared between threads; the lock is only held for lookups and inserts,
/// never while computing routes.
#[derive(Debug)]
pub struct RouteCache {
    entries: Mutex<LruCache<NodePair, CachedRoute>>,
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl RouteCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Checks whether a route from `from` to `to` is cached, without marking it as used.
    pub fn contains(&self, from: NodeId, to: NodeId) -> bool {
        self.entries
            .lock()
            .peek(&NodePair::new(from, to))
            .is_some_and(|cached| cached.from == from)
    }

    /// Returns the cached route from `from` to `to`, marking it as most recently used.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<Arc<Route>> {
        let mut entries = self.entries.lock();
        match entries.get(&NodePair::new(from, to)) {
            Some(cached) if cached.from == from => {
                log::debug!("route cache hit: {} -> {}", from, to);
                Some(cached.route.clone())
            }
            _ => {
                log::debug!("route cache miss: {} -> {}", from, to);
                None
            }
        }
    }

    /// Stores the route from `from` to `to`, replacing any route between those nodes
    /// and evicting the least recently used route if the cache is full.
    pub fn insert(&self, from: NodeId, to: NodeId, route: Arc<Route>) {
        let key = NodePair::new(from, to);
        let evicted = self.entries.lock().push(key, CachedRoute { from, route });
        if let Some((evicted_key, _)) = evicted.filter(|(k, _)| *k != key) {
            log::debug!("route cache eviction: {} <-> {}", evicted_key.0, evicted_key.1);
        }
    }

    /// Returns the cached route from `from` to `to`, or computes and stores it.
    ///
    /// Absent routes (`Ok(None)`) and errors are passed through without being cached.
    pub fn get_or_compute<E, F>(&self, from: NodeId, to: NodeId, compute: F) -> Result<Option<Arc<Route>>, E>
    where
        F: FnOnce() -> Result<Option<Route>, E>,
    {
        if let Some(route) = self.get(from, to) {
            return Ok(Some(route));
        }

        match compute()? {
            Some(route) => {
                let route = Arc::new(route);
                self.insert(from, to, route.clone());
                Ok(Some(route))
            }
            None => Ok(None),
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
