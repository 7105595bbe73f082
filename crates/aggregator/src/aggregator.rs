// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::hash_map;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use ahash::HashMap;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use clusterscope_types::Facets;

use crate::entry::AggregationEntry;
use crate::fetcher::{Facet, FacetFetcher, FetchError};

/// Message of an entry whose fetch ended without reporting any facet.
pub const FAILED_TO_FETCH_METADATA: &str = "Failed to fetch metadata";

type EntryOf<K, F> =
    AggregationEntry<Facets<<F as FacetFetcher<K>>::Size, <F as FacetFetcher<K>>::State>>;

struct Inner<K, F: FacetFetcher<K>> {
    fetcher: F,
    /// One single-writer cell per requested key. Membership only grows; the cell of a key is
    /// written by the fetch task of that key and nothing else.
    entries: RwLock<HashMap<K, watch::Sender<EntryOf<K, F>>>>,
}

/// Aggregates the size and state facets of a dynamic set of keys.
///
/// Every requested key gets its own fetch task which fetches both facets concurrently. The
/// key's entry is published once, when both facets have either arrived or failed. Readers take
/// consistent snapshots at any time without waiting for in-flight fetches.
///
/// Fetch tasks are spawned on the ambient Tokio runtime and are aborted when the aggregator
/// is dropped.
pub struct MetadataAggregator<K, F: FacetFetcher<K>> {
    inner: Arc<Inner<K, F>>,
    tasks: Mutex<JoinSet<()>>,
}

impl<K, F> MetadataAggregator<K, F>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    F: FacetFetcher<K>,
{
    pub fn new(fetcher: F) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                entries: RwLock::new(HashMap::default()),
            }),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.inner.fetcher
    }

    /// Starts fetching every key that has no entry yet. Keys that are already pending, ready or
    /// failed are left alone, so requesting the same keys repeatedly never duplicates work.
    ///
    /// Returns the number of fetches that were started.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn request(&self, keys: impl IntoIterator<Item = K>) -> usize {
        let mut unknown: Vec<K> = {
            let entries = self.inner.entries.read();
            keys.into_iter()
                .filter(|key| !entries.contains_key(key))
                .collect()
        };
        if unknown.is_empty() {
            return 0;
        }

        {
            let mut entries = self.inner.entries.write();
            // another caller may have claimed some keys between the two locks
            unknown.retain(|key| match entries.entry(key.clone()) {
                hash_map::Entry::Occupied(_) => false,
                hash_map::Entry::Vacant(vacant) => {
                    vacant.insert(watch::Sender::new(AggregationEntry::pending()));
                    true
                }
            });
        }

        let started = unknown.len();
        for key in unknown {
            self.spawn_fetch(key);
        }
        started
    }

    /// Fetches the given keys again unless a fetch is already in flight for them. Unknown keys
    /// are requested as if by [`Self::request`]. The previous value of a refetched key stays
    /// readable until it is replaced by the new pending entry.
    ///
    /// Returns the number of fetches that were started.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn rerun(&self, keys: impl IntoIterator<Item = K>) -> usize {
        let mut unknown = Vec::new();
        let mut restarted = Vec::new();
        {
            let entries = self.inner.entries.read();
            for key in keys {
                match entries.get(&key) {
                    None => unknown.push(key),
                    Some(cell) => {
                        // only one caller can flip a settled entry back to pending
                        let reset = cell.send_if_modified(|entry| {
                            if entry.is_pending() {
                                false
                            } else {
                                *entry = AggregationEntry::pending();
                                true
                            }
                        });
                        if reset {
                            restarted.push(key);
                        }
                    }
                }
            }
        }

        let restarted_count = restarted.len();
        for key in restarted {
            self.spawn_fetch(key);
        }
        restarted_count + self.request(unknown)
    }

    /// Point-in-time copy of every entry.
    pub fn snapshot(&self) -> HashMap<K, EntryOf<K, F>> {
        self.inner
            .entries
            .read()
            .iter()
            .map(|(key, cell)| (key.clone(), cell.borrow().clone()))
            .collect()
    }

    pub fn get(&self, key: &K) -> Option<EntryOf<K, F>> {
        self.inner
            .entries
            .read()
            .get(key)
            .map(|cell| cell.borrow().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// True if every given key has been requested and is no longer pending.
    pub fn is_settled<'a>(&self, keys: impl IntoIterator<Item = &'a K>) -> bool
    where
        K: 'a,
    {
        let entries = self.inner.entries.read();
        keys.into_iter().all(|key| {
            entries
                .get(key)
                .is_some_and(|cell| !cell.borrow().is_pending())
        })
    }

    /// Waits until none of the given keys is pending anymore. Keys that were never requested
    /// are ignored.
    pub async fn wait_settled<'a>(&self, keys: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        let receivers: Vec<_> = {
            let entries = self.inner.entries.read();
            keys.into_iter()
                .filter_map(|key| entries.get(key).map(watch::Sender::subscribe))
                .collect()
        };

        for mut receiver in receivers {
            // the sender lives as long as the aggregator, so this cannot observe a closed channel
            let _ = receiver.wait_for(|entry| !entry.is_pending()).await;
        }
    }

    fn spawn_fetch(&self, key: K) {
        let inner = Arc::clone(&self.inner);
        let mut tasks = self.tasks.lock();
        // reap finished fetches so the set does not grow with the number of keys
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move { inner.fetch(key).await });
    }
}

impl<K, F> Inner<K, F>
where
    K: Eq + Hash + Debug + Send + Sync + 'static,
    F: FacetFetcher<K>,
{
    async fn fetch(&self, key: K) {
        debug!(?key, "Fetching metadata");
        let outcome = AssertUnwindSafe(async {
            tokio::join!(self.fetcher.fetch_size(&key), self.fetcher.fetch_state(&key))
        })
        .catch_unwind()
        .await;

        let entry = match outcome {
            Ok((size, state)) => combine(&key, size, state),
            Err(_) => {
                warn!(?key, "Metadata fetch panicked");
                AggregationEntry::failed(None, FAILED_TO_FETCH_METADATA)
            }
        };
        trace!(?key, status = %entry.status(), "Metadata fetch finished");

        if let Some(cell) = self.entries.read().get(&key) {
            cell.send_replace(entry);
        }
    }
}

fn combine<K: Debug, S, T>(
    key: &K,
    size: Result<S, FetchError>,
    state: Result<T, FetchError>,
) -> AggregationEntry<Facets<S, T>> {
    let mut failed = Vec::with_capacity(2);
    let size = keep_facet(key, Facet::Size, size, &mut failed);
    let state = keep_facet(key, Facet::State, state, &mut failed);

    let facets = Facets { size, state };
    if failed.is_empty() {
        AggregationEntry::ready(facets)
    } else {
        AggregationEntry::failed(Some(facets), failure_message(&failed))
    }
}

fn keep_facet<K: Debug, V>(
    key: &K,
    facet: Facet,
    result: Result<V, FetchError>,
    failed: &mut Vec<Facet>,
) -> Option<V> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(?key, %facet, %err, "Failed to fetch facet");
            failed.push(facet);
            None
        }
    }
}

/// Message of an entry for which the given facets could not be fetched, e.g.
/// `Failed to fetch size, state`.
pub fn failure_message(failed: &[Facet]) -> String {
    if failed.is_empty() {
        return FAILED_TO_FETCH_METADATA.to_owned();
    }
    let facets: Vec<&'static str> = failed.iter().map(|facet| <&str>::from(*facet)).collect();
    format!("Failed to fetch {}", facets.join(", "))
}
