// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Normalization of the raw listings returned by a cluster's management API.
//!
//! The upstream endpoints are not consistent with each other: segments are reported either as
//! two arrays keyed by partition or as a flat list of status records, table names carry their
//! type as a suffix and child listings are expected but not guaranteed to be arrays. This crate
//! turns all of them into one uniform shape so that nothing downstream has to branch on the
//! response format.

mod children;
mod listing;
mod segments;
mod table_name;

pub use children::normalize_children;
pub use listing::{
    PAGE_SIZE_OPTIONS, SortField, SortOrder, TableQuery, TableWindow, available_kinds,
    format_bytes,
};
pub use segments::{SegmentRef, SegmentStatusEntry, normalize_segment_list, replicas_for_segment};
pub use table_name::{parse_entity_name, parse_table_listing};
