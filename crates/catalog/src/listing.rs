// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use clusterscope_types::{TableEntity, TableKind, TableMetadata};

/// Page sizes a table listing can be shown with.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];
const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortField {
    #[default]
    Name,
    ReportedSize,
    EstimatedSize,
    Status,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filter, sort order and page of a table listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TableQuery {
    /// Case-insensitive substring of the display name.
    pub search: String,
    pub kind: Option<TableKind>,
    pub sort: SortField,
    pub order: SortOrder,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            kind: None,
            sort: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The visible part of a table listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWindow {
    pub tables: Vec<TableEntity>,
    /// Number of tables that passed the filter, over all pages.
    pub total_matching: usize,
    pub total_pages: usize,
}

impl TableWindow {
    /// Raw names of the visible tables, i.e. the keys to request metadata for.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.raw_name.as_str())
    }
}

impl TableQuery {
    pub fn matches(&self, table: &TableEntity) -> bool {
        let matches_kind = self.kind.is_none_or(|kind| kind == table.kind);
        matches_kind
            && table
                .display_name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    /// Filters, sorts and paginates `tables`. `metadata` provides whatever is known about a
    /// table so far, keyed by raw name; unknown sizes sort as 0 and unknown statuses as
    /// `UNKNOWN`.
    pub fn window(
        &self,
        tables: &[TableEntity],
        metadata: impl Fn(&str) -> Option<TableMetadata>,
    ) -> TableWindow {
        let mut matching: Vec<(&TableEntity, TableMetadata)> = tables
            .iter()
            .filter(|table| self.matches(table))
            .map(|table| (table, metadata(&table.raw_name).unwrap_or_default()))
            .collect();

        matching.sort_by(|(a, a_meta), (b, b_meta)| {
            let ordering = match self.sort {
                SortField::Name => a.display_name.cmp(&b.display_name),
                SortField::ReportedSize => a_meta.reported_size().cmp(&b_meta.reported_size()),
                SortField::EstimatedSize => {
                    a_meta.estimated_size().cmp(&b_meta.estimated_size())
                }
                // verdict names, so BAD < GOOD < UNKNOWN
                SortField::Status => a_meta.status().as_str().cmp(b_meta.status().as_str()),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let page_size = self.page_size.max(1);
        let total_matching = matching.len();
        let start = self.page.max(1).saturating_sub(1).saturating_mul(page_size);

        TableWindow {
            tables: matching
                .into_iter()
                .skip(start)
                .take(page_size)
                .map(|(table, _)| table.clone())
                .collect(),
            total_matching,
            total_pages: total_matching.div_ceil(page_size),
        }
    }
}

/// Distinct kinds present in `tables`, sorted by name.
pub fn available_kinds(tables: &[TableEntity]) -> Vec<TableKind> {
    let mut kinds: Vec<TableKind> = tables
        .iter()
        .map(|t| t.kind)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    kinds.sort_by_key(|kind| kind.to_string());
    kinds
}

/// Human readable byte count in 1024-based units, with at most two decimals.
pub fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes <= 0 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use clusterscope_test_util::assert_eq;
    use clusterscope_types::{TableSize, TableState, Verdict};

    use crate::parse_entity_name;

    fn tables(names: &[&str]) -> Vec<TableEntity> {
        names.iter().map(|n| parse_entity_name(n)).collect()
    }

    fn names(window: &TableWindow) -> Vec<&str> {
        window.keys().collect()
    }

    fn metadata(reported: i64, status: Verdict) -> TableMetadata {
        TableMetadata {
            size: Some(TableSize {
                reported_size_in_bytes: reported,
                estimated_size_in_bytes: reported * 2,
            }),
            state: Some(TableState { status }),
        }
    }

    #[test]
    fn filters_by_search_and_kind() {
        let all = tables(&["Orders_REALTIME", "orders_OFFLINE", "users_OFFLINE", "misc"]);

        let query = TableQuery {
            search: "ORD".to_owned(),
            ..Default::default()
        };
        assert_eq!(
            names(&query.window(&all, |_| None)),
            vec!["Orders_REALTIME", "orders_OFFLINE"]
        );

        let query = TableQuery {
            kind: Some(TableKind::Offline),
            ..Default::default()
        };
        assert_eq!(
            names(&query.window(&all, |_| None)),
            vec!["orders_OFFLINE", "users_OFFLINE"]
        );
    }

    #[test]
    fn sorts_by_facets_with_defaults_for_unknown_tables() {
        let all = tables(&["a_OFFLINE", "b_OFFLINE", "c_OFFLINE"]);
        let known: HashMap<&str, TableMetadata> = HashMap::from([
            ("a_OFFLINE", metadata(300, Verdict::Good)),
            ("c_OFFLINE", metadata(100, Verdict::Bad)),
        ]);
        let lookup = |key: &str| known.get(key).copied();

        let by_size = TableQuery {
            sort: SortField::ReportedSize,
            ..Default::default()
        };
        assert_eq!(
            names(&by_size.window(&all, lookup)),
            vec!["b_OFFLINE", "c_OFFLINE", "a_OFFLINE"]
        );

        let by_status_desc = TableQuery {
            sort: SortField::Status,
            order: SortOrder::Desc,
            ..Default::default()
        };
        assert_eq!(
            names(&by_status_desc.window(&all, lookup)),
            vec!["b_OFFLINE", "a_OFFLINE", "c_OFFLINE"]
        );
    }

    #[test]
    fn paginates() {
        let all: Vec<TableEntity> = (0..23)
            .map(|i| parse_entity_name(&format!("t{i:02}_OFFLINE")))
            .collect();

        let query = TableQuery {
            page: 3,
            page_size: 10,
            ..Default::default()
        };
        let window = query.window(&all, |_| None);
        assert_eq!(names(&window), vec!["t20_OFFLINE", "t21_OFFLINE", "t22_OFFLINE"]);
        assert_eq!(window.total_matching, 23);
        assert_eq!(window.total_pages, 3);

        let past_the_end = TableQuery {
            page: 4,
            page_size: 10,
            ..Default::default()
        };
        assert!(past_the_end.window(&all, |_| None).tables.is_empty());
    }

    #[test]
    fn kinds_present() {
        let all = tables(&["a_OFFLINE", "b_REALTIME", "c_OFFLINE", "d"]);
        assert_eq!(
            available_kinds(&all),
            vec![TableKind::Offline, TableKind::Realtime, TableKind::Unknown]
        );
    }

    #[test]
    fn byte_formatting() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 + 1024 * 1024 * 10), "5.01 GB");
    }
}
