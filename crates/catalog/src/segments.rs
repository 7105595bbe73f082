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
use serde_json::Value;
use tracing::trace;

use clusterscope_types::{ClusterView, PartitionKind, ReplicaState};

/// Status label with which the cluster reports realtime segments that are still being built.
const CONSUMING_STATUS: &str = "CONSUMING";
/// Realtime segments are named `<table>__<partition>__<sequence>__<timestamp>`.
const REALTIME_NAME_SEPARATOR: &str = "__";

/// A segment of a table together with the partition it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRef {
    pub name: String,
    pub partition_kind: PartitionKind,
    /// Status as reported by the flat listing, carried through for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One record of the flat segment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStatusEntry {
    pub segment_name: String,
    #[serde(default)]
    pub segment_status: Option<String>,
}

impl From<SegmentStatusEntry> for SegmentRef {
    fn from(entry: SegmentStatusEntry) -> Self {
        let is_realtime = entry.segment_status.as_deref() == Some(CONSUMING_STATUS)
            || entry.segment_name.contains(REALTIME_NAME_SEPARATOR);

        SegmentRef {
            partition_kind: if is_realtime {
                PartitionKind::Realtime
            } else {
                PartitionKind::Offline
            },
            name: entry.segment_name,
            status: entry.segment_status,
        }
    }
}

/// Turns any of the segment listing shapes into a single list:
///
/// * `{ "OFFLINE": [names], "REALTIME": [names] }`, offline segments first;
/// * the same object wrapped in an array, as returned by the segments endpoint;
/// * `[{ "segmentName": .., "segmentStatus": .. }]`, where the partition is derived from the
///   status and the segment name.
///
/// Never fails: entries that don't fit the shape are skipped and unrecognized documents
/// produce an empty list.
pub fn normalize_segment_list(raw: &Value) -> Vec<SegmentRef> {
    match raw {
        Value::Object(_) => from_partitioned(raw),
        // a single well-formed status record is enough to pick the flat shape
        Value::Array(items) if items.iter().any(is_status_record) => from_status_entries(items),
        Value::Array(items) => match items.first() {
            Some(wrapped @ Value::Object(_)) => from_partitioned(wrapped),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn is_status_record(item: &Value) -> bool {
    item.get("segmentName").is_some_and(Value::is_string)
}

fn from_partitioned(raw: &Value) -> Vec<SegmentRef> {
    let mut segments = Vec::new();
    for kind in PartitionKind::ALL {
        let key: &'static str = kind.into();
        let Some(names) = raw.get(key).and_then(Value::as_array) else {
            continue;
        };
        segments.extend(names.iter().filter_map(Value::as_str).map(|name| SegmentRef {
            name: name.to_owned(),
            partition_kind: kind,
            status: None,
        }));
    }
    segments
}

fn from_status_entries(items: &[Value]) -> Vec<SegmentRef> {
    items
        .iter()
        .filter_map(|item| match SegmentStatusEntry::deserialize(item) {
            Ok(entry) => Some(SegmentRef::from(entry)),
            Err(err) => {
                trace!(%err, "Skipping malformed segment status entry");
                None
            }
        })
        .collect()
}

/// Replica placement of one segment, as seen in the observed view of its table.
pub fn replicas_for_segment(
    observed: &ClusterView,
    kind: PartitionKind,
    segment: &str,
) -> Vec<ReplicaState> {
    observed.replicas_of(kind, segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    use clusterscope_test_util::{ClusterViewBuilder, assert_eq};
    use serde_json::json;
    use test_log::test;

    fn offline(name: &str) -> SegmentRef {
        SegmentRef {
            name: name.to_owned(),
            partition_kind: PartitionKind::Offline,
            status: None,
        }
    }

    fn realtime(name: &str) -> SegmentRef {
        SegmentRef {
            name: name.to_owned(),
            partition_kind: PartitionKind::Realtime,
            status: None,
        }
    }

    #[test]
    fn partitioned_listing() {
        let segments = normalize_segment_list(&json!({
            "REALTIME": ["orders__0__1__20240101T0000Z"],
            "OFFLINE": ["orders_0", "orders_1"],
        }));

        assert_eq!(
            segments,
            vec![
                offline("orders_0"),
                offline("orders_1"),
                realtime("orders__0__1__20240101T0000Z"),
            ]
        );
    }

    #[test]
    fn wrapped_partitioned_listing() {
        let segments = normalize_segment_list(&json!([{ "OFFLINE": ["orders_0"] }]));
        assert_eq!(segments, vec![offline("orders_0")]);

        assert!(normalize_segment_list(&json!([])).is_empty());
    }

    #[test]
    fn flat_status_listing() {
        let segments = normalize_segment_list(&json!([
            { "segmentName": "orders_0", "segmentStatus": "GOOD" },
            { "segmentName": "orders__0__3__20240101T0000Z", "segmentStatus": "GOOD" },
            { "segmentName": "orders_tmp", "segmentStatus": "CONSUMING" },
            { "segmentStatus": "GOOD" },
        ]));

        assert_eq!(
            segments,
            vec![
                SegmentRef {
                    status: Some("GOOD".to_owned()),
                    ..offline("orders_0")
                },
                SegmentRef {
                    status: Some("GOOD".to_owned()),
                    ..realtime("orders__0__3__20240101T0000Z")
                },
                SegmentRef {
                    status: Some("CONSUMING".to_owned()),
                    ..realtime("orders_tmp")
                },
            ]
        );
    }

    #[test]
    fn flat_listing_starting_with_a_malformed_record() {
        let segments = normalize_segment_list(&json!([
            { "segmentStatus": "GOOD" },
            { "segmentName": "orders_0", "segmentStatus": "GOOD" },
            { "segmentName": 7 },
        ]));

        assert_eq!(
            segments,
            vec![SegmentRef {
                status: Some("GOOD".to_owned()),
                ..offline("orders_0")
            }]
        );
    }

    #[test]
    fn malformed_listings_are_empty() {
        assert!(normalize_segment_list(&json!("segments")).is_empty());
        assert!(normalize_segment_list(&json!(null)).is_empty());
        assert!(normalize_segment_list(&json!(["a", "b"])).is_empty());
        assert!(normalize_segment_list(&json!({ "OFFLINE": "orders_0" })).is_empty());
        assert_eq!(
            normalize_segment_list(&json!({ "OFFLINE": ["orders_0", 3] })),
            vec![offline("orders_0")]
        );
    }

    #[test]
    fn replicas_of_a_segment() {
        let observed = ClusterViewBuilder::default()
            .offline("orders_0", [("server_2", "ONLINE"), ("server_1", "ERROR")])
            .build();

        let replicas = replicas_for_segment(&observed, PartitionKind::Offline, "orders_0");
        assert_eq!(
            replicas
                .iter()
                .map(|r| (r.replica.as_str(), r.state.as_str()))
                .collect::<Vec<_>>(),
            vec![("server_1", "ERROR"), ("server_2", "ONLINE")]
        );
        assert!(replicas_for_segment(&observed, PartitionKind::Realtime, "orders_0").is_empty());
    }
}
