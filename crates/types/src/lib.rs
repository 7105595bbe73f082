// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Core types shared by the clusterscope components: the segment assignment model of a
//! table, the table naming model, the per-table metadata facets and the registry
//! configuration.

mod cluster_view;
mod metadata;
mod table;

pub mod config;
pub mod config_loader;

pub use cluster_view::*;
pub use metadata::*;
pub use table::*;
