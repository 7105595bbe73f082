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
use std::fmt;

use serde::Serialize;

use clusterscope_types::PartitionKind;

/// Per-partition results of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionResults {
    #[serde(rename = "OFFLINE", skip_serializing_if = "Option::is_none")]
    pub offline: Option<PartitionDiff>,
    #[serde(rename = "REALTIME", skip_serializing_if = "Option::is_none")]
    pub realtime: Option<PartitionDiff>,
}

impl PartitionResults {
    pub fn get(&self, kind: PartitionKind) -> Option<&PartitionDiff> {
        match kind {
            PartitionKind::Offline => self.offline.as_ref(),
            PartitionKind::Realtime => self.realtime.as_ref(),
        }
    }

    pub(crate) fn get_mut(&mut self, kind: PartitionKind) -> &mut Option<PartitionDiff> {
        match kind {
            PartitionKind::Offline => &mut self.offline,
            PartitionKind::Realtime => &mut self.realtime,
        }
    }
}

/// How the observed side of one partition compares to its desired side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionDiff {
    /// Segment sets are identical and every desired replica is observed in its desired state.
    pub matching: bool,
    /// One entry per desired segment.
    pub segments: BTreeMap<String, SegmentDiff>,
    /// Observed segments the desired side doesn't have.
    pub unexpected_segments: Vec<String>,
}

impl PartitionDiff {
    pub fn discrepancies(&self, partition: PartitionKind) -> Vec<Discrepancy> {
        let mut out = Vec::new();
        for (segment, diff) in &self.segments {
            if diff.missing {
                out.push(Discrepancy::MissingSegment {
                    partition,
                    segment: segment.clone(),
                });
                continue;
            }
            out.extend(diff.mismatches.iter().map(|mismatch| Discrepancy::Replica {
                partition,
                segment: segment.clone(),
                mismatch: mismatch.clone(),
            }));
        }
        out.extend(
            self.unexpected_segments
                .iter()
                .map(|segment| Discrepancy::UnexpectedSegment {
                    partition,
                    segment: segment.clone(),
                }),
        );
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDiff {
    /// The segment is desired but absent from the observed view.
    pub missing: bool,
    pub mismatches: Vec<ReplicaMismatch>,
}

impl SegmentDiff {
    pub(crate) fn missing() -> Self {
        Self {
            missing: true,
            mismatches: Vec::new(),
        }
    }
}

/// A desired replica that is either absent from the observed view (`observed_state` is `None`)
/// or observed in another state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaMismatch {
    pub replica: String,
    pub desired_state: String,
    pub observed_state: Option<String>,
}

/// A single disagreement between the two sides, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    MissingSegment {
        partition: PartitionKind,
        segment: String,
    },
    UnexpectedSegment {
        partition: PartitionKind,
        segment: String,
    },
    Replica {
        partition: PartitionKind,
        segment: String,
        mismatch: ReplicaMismatch,
    },
}

impl Discrepancy {
    pub fn partition(&self) -> PartitionKind {
        match self {
            Discrepancy::MissingSegment { partition, .. }
            | Discrepancy::UnexpectedSegment { partition, .. }
            | Discrepancy::Replica { partition, .. } => *partition,
        }
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::MissingSegment { partition, segment } => {
                write!(f, "{segment}: missing from the observed view ({partition})")
            }
            Discrepancy::UnexpectedSegment { partition, segment } => {
                write!(f, "{segment}: not in the desired state ({partition})")
            }
            Discrepancy::Replica {
                segment, mismatch, ..
            } => write!(
                f,
                "{segment}/{}: desired={}, observed={}",
                mismatch.replica,
                mismatch.desired_state,
                mismatch.observed_state.as_deref().unwrap_or("<absent>")
            ),
        }
    }
}
