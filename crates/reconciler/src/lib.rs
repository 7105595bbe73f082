// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Health check of a table's segment assignment.
//!
//! A table is healthy when every segment the coordinator wants to exist does exist, with every
//! replica it assigned in the state it assigned. The comparison goes from the desired (ideal)
//! state to the observed (external) view:
//!
//! * the segment sets of both sides must be identical, so a segment missing from the observed
//!   view and a segment only the observed view knows about both fail the check;
//! * for every segment, each replica of the desired side must be present in the observed side
//!   with the same state. Replicas only the observed side knows about are ignored.
//!
//! A partition without desired segments never fails the check, whatever the observed side says.

mod diff;

pub use diff::{Discrepancy, PartitionDiff, PartitionResults, ReplicaMismatch, SegmentDiff};

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use clusterscope_types::{ClusterView, PartitionKind, SegmentAssignment, Verdict};

/// Outcome of [`reconcile`]: the verdict plus enough detail to find what disagrees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// Either [`Verdict::Good`] or [`Verdict::Bad`], never [`Verdict::Unknown`].
    pub verdict: Verdict,
    pub partition_results: PartitionResults,
}

impl Reconciliation {
    pub fn is_good(&self) -> bool {
        self.verdict == Verdict::Good
    }

    /// Every missing segment, unexpected segment and replica mismatch, offline first.
    pub fn discrepancies(&self) -> Vec<Discrepancy> {
        PartitionKind::ALL
            .into_iter()
            .filter_map(|kind| {
                self.partition_results
                    .get(kind)
                    .map(|diff| diff.discrepancies(kind))
            })
            .flatten()
            .collect()
    }
}

/// Compares the desired assignment of a table against the observed one.
///
/// Never fails: absent partitions are compared as empty ones. A partition appears in the
/// result when at least one of the two sides has it.
pub fn reconcile(desired: &ClusterView, observed: &ClusterView) -> Reconciliation {
    let mut partition_results = PartitionResults::default();
    let mut verdict = Verdict::Good;

    for kind in PartitionKind::ALL {
        let desired_partition = desired.partition(kind);
        let observed_partition = observed.partition(kind);
        if desired_partition.is_none() && observed_partition.is_none() {
            continue;
        }

        let empty = SegmentAssignment::default();
        let desired_partition = desired_partition.unwrap_or(&empty);
        let diff = diff_partition(desired_partition, observed_partition.unwrap_or(&empty));

        if !desired_partition.is_empty() && !diff.matching {
            verdict = Verdict::Bad;
        }
        *partition_results.get_mut(kind) = Some(diff);
    }

    debug!(%verdict, "Reconciled desired and observed segment assignment");
    Reconciliation {
        verdict,
        partition_results,
    }
}

fn diff_partition(desired: &SegmentAssignment, observed: &SegmentAssignment) -> PartitionDiff {
    let mut matching = desired.len() == observed.len();
    let mut segments = BTreeMap::new();

    for (segment, desired_replicas) in desired {
        let Some(observed_replicas) = observed.replicas(segment) else {
            trace!(segment, "Segment missing from the observed view");
            matching = false;
            segments.insert(segment.clone(), SegmentDiff::missing());
            continue;
        };

        let mismatches: Vec<ReplicaMismatch> = desired_replicas
            .iter()
            .filter_map(|(replica, desired_state)| {
                let observed_state = observed_replicas.get(replica);
                (observed_state != Some(desired_state)).then(|| ReplicaMismatch {
                    replica: replica.clone(),
                    desired_state: desired_state.clone(),
                    observed_state: observed_state.cloned(),
                })
            })
            .collect();

        if !mismatches.is_empty() {
            trace!(segment, mismatches = mismatches.len(), "Replica states disagree");
            matching = false;
        }
        segments.insert(
            segment.clone(),
            SegmentDiff {
                missing: false,
                mismatches,
            },
        );
    }

    let unexpected_segments: Vec<String> = observed
        .segments()
        .filter(|segment| !desired.contains_segment(segment))
        .map(str::to_owned)
        .collect();

    PartitionDiff {
        matching,
        segments,
        unexpected_segments,
    }
}
