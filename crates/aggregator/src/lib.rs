// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Concurrent, per-entity aggregation of independently fetched metadata facets.
//!
//! A [`MetadataAggregator`] owns one entry per requested key. Requesting a key starts a fetch of
//! both of its facets; the entry then moves from `PENDING` to either `READY` or `FAILED`
//! exactly once. Keys never influence each other: a slow or failing key leaves every other
//! key's entry untouched.

mod aggregator;
mod entry;
mod fetcher;

pub use aggregator::{FAILED_TO_FETCH_METADATA, MetadataAggregator, failure_message};
pub use entry::{AggregationEntry, EntryStatus};
pub use fetcher::{Facet, FacetFetcher, FetchError, FnFetcher, fn_fetcher};
