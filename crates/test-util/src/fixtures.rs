// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use clusterscope_types::{ClusterView, PartitionKind, SegmentAssignment};

/// Builds [`ClusterView`] documents for tests.
///
/// ```rust
/// use clusterscope_test_util::ClusterViewBuilder;
///
/// let view = ClusterViewBuilder::default()
///     .offline("seg1", [("r1", "ONLINE"), ("r2", "ONLINE")])
///     .build();
/// assert_eq!(view.offline.unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterViewBuilder {
    view: ClusterView,
}

impl ClusterViewBuilder {
    pub fn segment<'a>(
        mut self,
        kind: PartitionKind,
        segment: &str,
        replicas: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let assignment = self
            .view
            .partition_mut(kind)
            .get_or_insert_with(SegmentAssignment::default);
        assignment.insert_segment(segment);
        for (replica, state) in replicas {
            assignment.insert_replica(segment, replica, state);
        }
        self
    }

    pub fn offline<'a>(
        self,
        segment: &str,
        replicas: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.segment(PartitionKind::Offline, segment, replicas)
    }

    pub fn realtime<'a>(
        self,
        segment: &str,
        replicas: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.segment(PartitionKind::Realtime, segment, replicas)
    }

    /// Marks a partition as present but without segments.
    pub fn empty(mut self, kind: PartitionKind) -> Self {
        self.view
            .partition_mut(kind)
            .get_or_insert_with(SegmentAssignment::default);
        self
    }

    pub fn build(self) -> ClusterView {
        self.view
    }
}
