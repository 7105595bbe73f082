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

/// Table type, as encoded in the suffix of a table's raw name.
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
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TableKind {
    Realtime,
    Offline,
    Dimension,
    #[default]
    Unknown,
}

impl TableKind {
    /// Recognized kinds, in the order their suffixes are matched.
    pub const SUFFIXED: [TableKind; 3] = [TableKind::Realtime, TableKind::Offline, TableKind::Dimension];

    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            TableKind::Realtime => Some("_REALTIME"),
            TableKind::Offline => Some("_OFFLINE"),
            TableKind::Dimension => Some("_DIMENSION"),
            TableKind::Unknown => None,
        }
    }
}

/// A table as listed by the cluster.
///
/// `raw_name` is the key used for every downstream lookup. `display_name` has the type suffix
/// stripped and is only meant for presentation: `orders_REALTIME` and `orders_OFFLINE` share it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntity {
    pub raw_name: String,
    pub display_name: String,
    pub kind: TableKind,
}
