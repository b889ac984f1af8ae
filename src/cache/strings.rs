// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{collections::HashMap, sync::Arc, time::Duration};

use bytes::Bytes;
use tokio::{
    select,
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, sleep},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How often the background sweeper wakes up to drop expired entries.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

const NIL: usize = usize::MAX;

struct Entry {
    key: Bytes,
    value: Bytes,
    expires_at: Instant,
    prev: usize,
    next: usize,
}

/// Map plus slab-backed recency list. The map's key set and the list's
/// element set are always identical, every key appears exactly once in the
/// list, and `map.len() <= max_size`. `head` is the most recently touched
/// key, `tail` the eviction victim.
struct LruState {
    max_size: usize,
    map: HashMap<Bytes, usize>,
    slots: Vec<Option<Entry>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
}

impl LruState {
    fn new(max_size: usize) -> Self {
        Self {
            max_size,
            map: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(e) => (e.prev, e.next),
            None => return,
        };
        match self.slots.get_mut(prev).and_then(Option::as_mut) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match self.slots.get_mut(next).and_then(Option::as_mut) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(e) = self.slots[idx].as_mut() {
            e.prev = NIL;
            e.next = old_head;
        }
        if let Some(h) = self.slots.get_mut(old_head).and_then(Option::as_mut) {
            h.prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn touch(&mut self, idx: usize) {
        self.unlink(idx);
        self.push_front(idx);
    }

    fn alloc(&mut self, entry: Entry) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            },
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            },
        }
    }

    /// Removes `key` from map, list and slab.
    fn remove(&mut self, key: &Bytes) -> Option<Entry> {
        let idx = self.map.remove(key)?;
        self.unlink(idx);
        let entry = self.slots[idx].take();
        self.free.push(idx);
        entry
    }

    /// Drops the least recently used entry, if any.
    fn evict_lru(&mut self) -> Option<Bytes> {
        if self.tail == NIL {
            return None;
        }
        let victim = self.slots[self.tail].as_ref().map(|e| e.key.clone())?;
        self.remove(&victim);
        Some(victim)
    }

    fn insert_front(&mut self, entry: Entry) {
        let key = entry.key.clone();
        let idx = self.alloc(entry);
        self.push_front(idx);
        self.map.insert(key, idx);
    }
}

/// Thread-safe, size-bounded key/value cache with per-entry TTL and LRU
/// eviction. A single mutex linearizes every operation, including the
/// recency update performed by [`StringCache::get`].
pub struct StringCache {
    state: Mutex<LruState>,
    cancel: CancellationToken,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl StringCache {
    /// Creates the cache and spawns its expiry sweeper. One sweeper exists
    /// per instance and runs until [`StringCache::shutdown`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(max_size: usize) -> Arc<Self> {
        let cache = Arc::new(Self {
            state: Mutex::new(LruState::new(max_size)),
            cancel: CancellationToken::new(),
            sweeper: Mutex::new(None),
        });

        let worker = Arc::clone(&cache);
        let handle = tokio::spawn(async move {
            loop {
                select! {
                    _ = worker.cancel.cancelled() => break,
                    _ = sleep(SWEEP_INTERVAL) => {
                        let removed = worker.purge_expired().await;
                        if removed > 0 {
                            info!(removed, "expired entries removed from cache");
                        }
                    },
                }
            }
            debug!("cache sweeper stopped");
        });
        if let Ok(mut slot) = cache.sweeper.try_lock() {
            *slot = Some(handle);
        }

        cache
    }

    /// Stores `key` with a time-to-live. An existing key is overwritten and
    /// refreshed in place; a new key on a full cache evicts the least
    /// recently used entry first. A zero TTL stores an entry that is already
    /// expired, so the next `get` misses.
    pub async fn set(&self, key: Bytes, value: Bytes, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        let mut state = self.state.lock().await;

        if let Some(&idx) = state.map.get(&key) {
            if let Some(e) = state.slots[idx].as_mut() {
                e.value = value;
                e.expires_at = expires_at;
            }
            state.touch(idx);
            return;
        }

        if state.map.len() >= state.max_size {
            if let Some(victim) = state.evict_lru() {
                debug!(key = %String::from_utf8_lossy(&victim), "evicted LRU entry");
            }
        }
        state.insert_front(Entry {
            key: key.clone(),
            value,
            expires_at,
            prev: NIL,
            next: NIL,
        });
        debug!(key = %String::from_utf8_lossy(&key), "key set");
    }

    /// Looks up `key`. A hit refreshes recency; an expired entry is removed
    /// on the spot and reported as a miss.
    pub async fn get(&self, key: &Bytes) -> Option<Bytes> {
        let mut state = self.state.lock().await;
        let idx = *state.map.get(key)?;

        let (value, live) = match state.slots[idx].as_ref() {
            Some(e) => (e.value.clone(), e.expires_at > Instant::now()),
            None => return None,
        };
        if !live {
            state.remove(key);
            return None;
        }
        state.touch(idx);
        Some(value)
    }

    /// Removes `key` if present; a miss is a no-op.
    pub async fn delete(&self, key: &Bytes) {
        let mut state = self.state.lock().await;
        if state.remove(key).is_some() {
            debug!(key = %String::from_utf8_lossy(key), "key deleted");
        }
    }

    /// Number of live map entries (expired-but-unswept entries included).
    pub async fn len(&self) -> usize {
        self.state.lock().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Keys in recency order, most recently touched first. Diagnostics only.
    pub async fn keys(&self) -> Vec<Bytes> {
        let state = self.state.lock().await;
        let mut out = Vec::with_capacity(state.map.len());
        let mut cursor = state.head;
        while cursor != NIL {
            match state.slots[cursor].as_ref() {
                Some(e) => {
                    out.push(e.key.clone());
                    cursor = e.next;
                },
                None => break,
            }
        }
        out
    }

    /// Drops every entry whose deadline has passed. Called by the sweeper
    /// every 60 seconds; callable directly for deterministic tests.
    pub async fn purge_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let expired: Vec<Bytes> = state
            .map
            .values()
            .filter_map(|&idx| {
                state.slots[idx]
                    .as_ref()
                    .filter(|e| e.expires_at <= now)
                    .map(|e| e.key.clone())
            })
            .collect();
        for key in &expired {
            state.remove(key);
        }
        expired.len()
    }

    /// Stops the sweeper and waits for it to observe the signal, so the
    /// cache can be dropped without leaking the background task.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self.sweeper.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}
