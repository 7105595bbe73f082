// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::Verdict;

/// Size facet of a table, as reported by the cluster's size endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSize {
    pub reported_size_in_bytes: i64,
    pub estimated_size_in_bytes: i64,
}

/// Health facet of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    pub status: Verdict,
}

/// Whatever is known about the two facets of an entity. A facet that failed to load is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets<S, T> {
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub size: Option<S>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub state: Option<T>,
}

impl<S, T> Default for Facets<S, T> {
    fn default() -> Self {
        Self {
            size: None,
            state: None,
        }
    }
}

impl<S, T> Facets<S, T> {
    pub fn is_complete(&self) -> bool {
        self.size.is_some() && self.state.is_some()
    }
}

pub type TableMetadata = Facets<TableSize, TableState>;

impl TableMetadata {
    pub fn reported_size(&self) -> i64 {
        self.size.map(|s| s.reported_size_in_bytes).unwrap_or(0)
    }

    pub fn estimated_size(&self) -> i64 {
        self.size.map(|s| s.estimated_size_in_bytes).unwrap_or(0)
    }

    pub fn status(&self) -> Verdict {
        self.state.map(|s| s.status).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn size_payload_ignores_extra_fields() {
        let size: TableSize = serde_json::from_value(json!({
            "tableName": "orders_OFFLINE",
            "reportedSizeInBytes": 2048,
            "estimatedSizeInBytes": 4096,
            "offlineSegments": null,
        }))
        .unwrap();

        assert_eq!(
            size,
            TableSize {
                reported_size_in_bytes: 2048,
                estimated_size_in_bytes: 4096
            }
        );
    }

    #[test]
    fn missing_facets_fall_back_to_defaults() {
        let metadata = TableMetadata {
            size: None,
            state: Some(TableState {
                status: Verdict::Bad,
            }),
        };

        assert!(!metadata.is_complete());
        assert_eq!(metadata.reported_size(), 0);
        assert_eq!(metadata.estimated_size(), 0);
        assert_eq!(metadata.status(), Verdict::Bad);
        assert_eq!(TableMetadata::default().status(), Verdict::Unknown);
    }
}
