// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    strum::Display,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Pending,
    Ready,
    Failed,
}

/// State of one key in a [`crate::MetadataAggregator`].
///
/// A `READY` entry always carries a value. A `FAILED` entry carries an error message and, if
/// some facets could still be fetched, whatever is known about them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationEntry<V> {
    status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl<V> AggregationEntry<V> {
    pub(crate) fn pending() -> Self {
        Self {
            status: EntryStatus::Pending,
            value: None,
            error_message: None,
        }
    }

    pub(crate) fn ready(value: V) -> Self {
        Self {
            status: EntryStatus::Ready,
            value: Some(value),
            error_message: None,
        }
    }

    pub(crate) fn failed(partial: Option<V>, message: impl Into<String>) -> Self {
        Self {
            status: EntryStatus::Failed,
            value: partial,
            error_message: Some(message.into()),
        }
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    pub fn is_ready(&self) -> bool {
        self.status == EntryStatus::Ready
    }

    pub fn is_failed(&self) -> bool {
        self.status == EntryStatus::Failed
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<V> {
        self.value
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
