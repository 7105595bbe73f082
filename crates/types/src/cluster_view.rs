// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The two independent assignment subsystems of a table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PartitionKind {
    Offline,
    Realtime,
}

impl PartitionKind {
    pub const ALL: [PartitionKind; 2] = [PartitionKind::Offline, PartitionKind::Realtime];
}

/// Health verdict of a table. [`Verdict::Unknown`] is only ever assigned by callers that could
/// not attempt a reconciliation, e.g. because one of the two views failed to load.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Good,
    Bad,
    #[default]
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One serving copy of a segment and the state label it carries. The state is an open set
/// ("ONLINE", "OFFLINE", "CONSUMING", "ERROR", ...) and is only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplicaState {
    pub replica: String,
    pub state: String,
}

/// Replica id to state label, for one segment.
pub type ReplicaStates = BTreeMap<String, String>;

/// Segment name to its replica states, for one partition of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentAssignment(BTreeMap<String, ReplicaStates>);

impl SegmentAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_segment(&self, segment: &str) -> bool {
        self.0.contains_key(segment)
    }

    pub fn replicas(&self, segment: &str) -> Option<&ReplicaStates> {
        self.0.get(segment)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ReplicaStates> {
        self.0.iter()
    }

    /// Adds a segment without replicas if it's not present yet.
    pub fn insert_segment(&mut self, segment: impl Into<String>) -> &mut ReplicaStates {
        self.0.entry(segment.into()).or_default()
    }

    /// Sets the state of `replica` for `segment`, creating the segment if needed.
    pub fn insert_replica(
        &mut self,
        segment: impl Into<String>,
        replica: impl Into<String>,
        state: impl Into<String>,
    ) -> &mut Self {
        self.insert_segment(segment)
            .insert(replica.into(), state.into());
        self
    }

    /// Removes a replica, returning its previous state. The segment stays even if this was its
    /// last replica.
    pub fn remove_replica(&mut self, segment: &str, replica: &str) -> Option<String> {
        self.0.get_mut(segment)?.remove(replica)
    }

    pub fn remove_segment(&mut self, segment: &str) -> Option<ReplicaStates> {
        self.0.remove(segment)
    }

    /// Builds an assignment out of an arbitrary json value. Anything that is not an object
    /// yields an empty assignment, a segment whose value is not an object has no replicas and
    /// non-string states are kept in their json rendering.
    pub fn from_json_lossy(value: &Value) -> Self {
        let Some(segments) = value.as_object() else {
            return Self::default();
        };

        let mut assignment = Self::default();
        for (segment, replicas) in segments {
            let states = assignment.insert_segment(segment.as_str());
            let Some(replicas) = replicas.as_object() else {
                continue;
            };
            for (replica, state) in replicas {
                let state = match state {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                states.insert(replica.clone(), state);
            }
        }
        assignment
    }
}

impl<'a> IntoIterator for &'a SegmentAssignment {
    type Item = (&'a String, &'a ReplicaStates);
    type IntoIter = btree_map::Iter<'a, String, ReplicaStates>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, ReplicaStates)> for SegmentAssignment {
    fn from_iter<T: IntoIterator<Item = (String, ReplicaStates)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Segment assignment of a table, split by partition kind. Used for both the desired (ideal
/// state) and the observed (external view) side of a table.
///
/// An absent partition means the table has no segments of that kind. It is distinct from an
/// empty assignment, although both have nothing to reconcile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterView {
    #[serde(rename = "OFFLINE", default, skip_serializing_if = "Option::is_none")]
    pub offline: Option<SegmentAssignment>,
    #[serde(rename = "REALTIME", default, skip_serializing_if = "Option::is_none")]
    pub realtime: Option<SegmentAssignment>,
}

impl ClusterView {
    pub fn partition(&self, kind: PartitionKind) -> Option<&SegmentAssignment> {
        match kind {
            PartitionKind::Offline => self.offline.as_ref(),
            PartitionKind::Realtime => self.realtime.as_ref(),
        }
    }

    pub fn partition_mut(&mut self, kind: PartitionKind) -> &mut Option<SegmentAssignment> {
        match kind {
            PartitionKind::Offline => &mut self.offline,
            PartitionKind::Realtime => &mut self.realtime,
        }
    }

    pub fn with_partition(mut self, kind: PartitionKind, assignment: SegmentAssignment) -> Self {
        *self.partition_mut(kind) = Some(assignment);
        self
    }

    /// Replicas of one segment, ordered by replica id. Empty if either the partition or the
    /// segment is absent.
    pub fn replicas_of(&self, kind: PartitionKind, segment: &str) -> Vec<ReplicaState> {
        self.partition(kind)
            .and_then(|assignment| assignment.replicas(segment))
            .map(|replicas| {
                replicas
                    .iter()
                    .map(|(replica, state)| ReplicaState {
                        replica: replica.clone(),
                        state: state.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reads a view out of an already parsed json document without ever failing. Missing
    /// partition keys stay absent, malformed partitions become empty assignments and a
    /// document that is not an object is an empty view.
    pub fn from_json_lossy(value: &Value) -> Self {
        let mut view = ClusterView::default();
        let Some(object) = value.as_object() else {
            return view;
        };

        for kind in PartitionKind::ALL {
            let key: &'static str = kind.into();
            if let Some(partition) = object.get(key) {
                *view.partition_mut(kind) = Some(SegmentAssignment::from_json_lossy(partition));
            }
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use googletest::prelude::*;
    use serde_json::json;

    #[test]
    fn partition_kind_names() {
        assert_eq!(PartitionKind::Offline.to_string(), "OFFLINE");
        assert_eq!(
            "realtime".parse::<PartitionKind>().unwrap(),
            PartitionKind::Realtime
        );
        assert_eq!(Verdict::Good.as_str(), "GOOD");
        assert_eq!(Verdict::default(), Verdict::Unknown);
    }

    #[test]
    fn strict_and_lossy_parsing_agree_on_well_formed_documents() {
        let doc = json!({
            "OFFLINE": { "seg1": { "r1": "ONLINE", "r2": "OFFLINE" } },
            "REALTIME": {}
        });

        let strict: ClusterView = serde_json::from_value(doc.clone()).unwrap();
        let lossy = ClusterView::from_json_lossy(&doc);

        assert_eq!(strict, lossy);
        assert_that!(strict.realtime, some(predicate(SegmentAssignment::is_empty)));
        assert_eq!(
            strict.offline.unwrap().replicas("seg1").unwrap().get("r2"),
            Some(&"OFFLINE".to_owned())
        );
    }

    #[test]
    fn lossy_parsing_absorbs_malformed_partitions() {
        let view = ClusterView::from_json_lossy(&json!({
            "OFFLINE": ["not", "an", "object"],
            "REALTIME": { "seg1": 42, "seg2": { "r1": 1 } },
        }));

        assert_that!(view.offline, some(predicate(SegmentAssignment::is_empty)));
        let realtime = view.realtime.unwrap();
        assert_eq!(realtime.len(), 2);
        assert!(realtime.replicas("seg1").unwrap().is_empty());
        assert_eq!(
            realtime.replicas("seg2").unwrap().get("r1"),
            Some(&"1".to_owned())
        );

        assert_eq!(ClusterView::from_json_lossy(&json!("nope")), ClusterView::default());
        assert_eq!(ClusterView::from_json_lossy(&json!({})), ClusterView::default());
    }

    #[test]
    fn absent_partitions_are_not_serialized() {
        let mut assignment = SegmentAssignment::new();
        assignment.insert_replica("seg1", "r1", "ONLINE");
        let view = ClusterView::default().with_partition(PartitionKind::Offline, assignment);

        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({ "OFFLINE": { "seg1": { "r1": "ONLINE" } } })
        );
    }

    #[test]
    fn replicas_of_segment() {
        let mut assignment = SegmentAssignment::new();
        assignment
            .insert_replica("seg1", "server_b", "ONLINE")
            .insert_replica("seg1", "server_a", "ERROR");
        let view = ClusterView::default().with_partition(PartitionKind::Realtime, assignment);

        let replicas = view.replicas_of(PartitionKind::Realtime, "seg1");
        assert_eq!(
            replicas,
            vec![
                ReplicaState {
                    replica: "server_a".to_owned(),
                    state: "ERROR".to_owned()
                },
                ReplicaState {
                    replica: "server_b".to_owned(),
                    state: "ONLINE".to_owned()
                },
            ]
        );
        assert!(view.replicas_of(PartitionKind::Offline, "seg1").is_empty());
        assert!(view.replicas_of(PartitionKind::Realtime, "seg2").is_empty());
    }
}
