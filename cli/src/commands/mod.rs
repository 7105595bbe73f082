// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod clusters;
pub mod reconcile;
pub mod segments;
pub mod tables;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use clusterscope_types::ClusterView;

/// Reads a json document from disk.
pub(crate) async fn read_json(path: &Path) -> Result<Value> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not a valid json document", path.display()))
}

/// Reads a segment assignment document. Anything that parses as json is accepted; parts that
/// don't fit the assignment shape are dropped.
pub(crate) async fn read_view(path: &Path) -> Result<ClusterView> {
    Ok(ClusterView::from_json_lossy(&read_json(path).await?))
}
