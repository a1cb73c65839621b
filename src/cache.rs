// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for protocol kit instances.
//!
//! Building a protocol kit instance reads the Safe's on-chain state, so the
//! plugin keeps the instances it has built for the current session. Entries
//! are keyed by session generation and Safe address: instances built for a
//! previous session can never be returned, even if they were inserted after
//! the cache was cleared.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use lru::LruCache;

use crate::providers::SafeProtocol;

/// Default number of Safes kept per plugin.
pub const DEFAULT_CAPACITY: usize = 8;

type CacheKey = (u64, Address);

pub struct ProtocolCache {
    cache: Mutex<LruCache<CacheKey, Arc<dyn SafeProtocol>>>,
}

impl ProtocolCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, generation: u64, safe: Address) -> Option<Arc<dyn SafeProtocol>> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(&(generation, safe)).cloned()
    }

    pub fn put(&self, generation: u64, safe: Address, kit: Arc<dyn SafeProtocol>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put((generation, safe), kit);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProtocolCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
