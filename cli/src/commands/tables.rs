// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use cling::prelude::*;
use comfy_table::{Cell, Table};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use clusterscope_aggregator::{FacetFetcher, FetchError, MetadataAggregator};
use clusterscope_catalog::{
    PAGE_SIZE_OPTIONS, SortField, SortOrder, TableQuery, TableWindow, available_kinds,
    parse_table_listing,
};
use clusterscope_reconciler::reconcile;
use clusterscope_types::{ClusterView, TableEntity, TableKind, TableSize, TableState};

use crate::cli_env::CliEnv;
use crate::commands::read_json;
use crate::ui::console::{StyledTable, c_eprintln, c_println};
use crate::ui::render::{render_size, render_table_status};

const SIZE_FILE: &str = "size.json";
const STATE_FILE: &str = "state.json";

#[derive(Run, Parser, Collect, Clone)]
#[cling(run = "run_tables")]
pub struct Tables {
    /// Table listing of the cluster, `{ "tables": [...] }`
    #[clap(long)]
    tables: PathBuf,

    /// Directory with one sub-directory per table holding `size.json` and `state.json`
    #[clap(long)]
    metadata_dir: PathBuf,

    /// Only show tables whose name contains this, ignoring case
    #[clap(long, default_value = "")]
    search: String,

    /// Only show tables of this type
    #[clap(long)]
    kind: Option<TableKind>,

    /// Column to sort by
    #[clap(long, default_value_t = SortField::Name)]
    sort: SortField,

    /// Sort in descending order
    #[clap(long)]
    desc: bool,

    /// Page to show, starting at 1
    #[clap(long, default_value_t = 1)]
    page: usize,

    /// Tables per page, one of 10, 25, 50 or 100
    #[clap(long, default_value_t = 25, value_parser = parse_page_size)]
    page_size: usize,
}

impl Tables {
    fn query(&self) -> TableQuery {
        TableQuery {
            search: self.search.clone(),
            kind: self.kind,
            sort: self.sort,
            order: if self.desc {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            },
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw.parse().map_err(|err| format!("{err}"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

/// Reads the facets of a table from `<root>/<table>/size.json` and `<root>/<table>/state.json`.
///
/// The state document holds both sides of the table's assignment,
/// `{ "idealState": .., "externalView": .. }`; the state facet is their reconciled verdict.
#[derive(Debug, Clone)]
pub struct MetadataDir {
    root: PathBuf,
}

impl MetadataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Table names come from the listing file and must name a directory directly below the
    /// root.
    fn facet_path(&self, table: &str, file: &str) -> Result<PathBuf, FetchError> {
        let mut components = Path::new(table).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == table => {
                Ok(self.root.join(name).join(file))
            }
            _ => Err(FetchError::new(format!("invalid table name '{table}'"))),
        }
    }
}

async fn read_facet<T: DeserializeOwned>(path: PathBuf) -> Result<T, FetchError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|err| FetchError::new(format!("cannot read {}: {err}", path.display())))?;
    serde_json::from_slice(&bytes)
        .map_err(|err| FetchError::new(format!("cannot parse {}: {err}", path.display())))
}

impl FacetFetcher<String> for MetadataDir {
    type Size = TableSize;
    type State = TableState;

    fn fetch_size(
        &self,
        table: &String,
    ) -> impl Future<Output = Result<TableSize, FetchError>> + Send {
        let path = self.facet_path(table, SIZE_FILE);
        async move { read_facet(path?).await }
    }

    fn fetch_state(
        &self,
        table: &String,
    ) -> impl Future<Output = Result<TableState, FetchError>> + Send {
        let path = self.facet_path(table, STATE_FILE);
        async move {
            let document: Value = read_facet(path?).await?;
            let desired = ClusterView::from_json_lossy(&document["idealState"]);
            let observed = ClusterView::from_json_lossy(&document["externalView"]);
            Ok(TableState {
                status: reconcile(&desired, &observed).verdict,
            })
        }
    }
}

/// Loads the metadata the window of `query` depends on and computes the window. Sorting by a
/// facet needs the metadata of every matching table, sorting by name only that of the
/// visible page.
async fn load_window<F>(
    query: &TableQuery,
    tables: &[TableEntity],
    aggregator: &MetadataAggregator<String, F>,
) -> TableWindow
where
    F: FacetFetcher<String, Size = TableSize, State = TableState>,
{
    let keys: Vec<String> = match query.sort {
        SortField::Name => query
            .window(tables, |_| None)
            .keys()
            .map(str::to_owned)
            .collect(),
        SortField::ReportedSize | SortField::EstimatedSize | SortField::Status => tables
            .iter()
            .filter(|table| query.matches(table))
            .map(|table| table.raw_name.clone())
            .collect(),
    };

    let started = aggregator.request(keys.iter().cloned());
    debug!(requested = keys.len(), started, "Loading table metadata");
    aggregator.wait_settled(&keys).await;

    let snapshot = aggregator.snapshot();
    query.window(tables, |name| {
        snapshot.get(name).and_then(|entry| entry.value().cloned())
    })
}

pub async fn run_tables(State(env): State<CliEnv>, opts: &Tables) -> Result<()> {
    let tables = parse_table_listing(&read_json(&opts.tables).await?);
    if tables.is_empty() {
        c_eprintln!("No tables were found in {}", opts.tables.display());
        return Ok(());
    }

    let query = opts.query();
    let aggregator = MetadataAggregator::new(MetadataDir::new(&opts.metadata_dir));
    let window = load_window(&query, &tables, &aggregator).await;

    if window.tables.is_empty() {
        let kinds: Vec<String> = available_kinds(&tables)
            .into_iter()
            .map(|kind| kind.to_string())
            .collect();
        c_eprintln!(
            "No tables match the given filter. Available types: {}",
            kinds.join(", ")
        );
        return Ok(());
    }

    let snapshot = aggregator.snapshot();
    let mut table = Table::new_styled(&env);
    table.set_styled_header(vec![
        "NAME",
        "TYPE",
        "REPORTED SIZE",
        "ESTIMATED SIZE",
        "STATUS",
        "ERROR",
    ]);
    for entity in &window.tables {
        let entry = snapshot.get(&entity.raw_name);
        let size = entry
            .and_then(|entry| entry.value())
            .and_then(|metadata| metadata.size);

        table.add_row(vec![
            Cell::new(&entity.display_name),
            Cell::new(entity.kind),
            Cell::new(render_size(size.map(|s| s.reported_size_in_bytes))),
            Cell::new(render_size(size.map(|s| s.estimated_size_in_bytes))),
            render_table_status(entry),
            Cell::new(entry.and_then(|entry| entry.error_message()).unwrap_or_default()),
        ]);
    }
    c_println!("{}", table);
    c_println!(
        "Page {} of {}, {} matching tables",
        query.page,
        window.total_pages,
        window.total_matching
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;
    use test_log::test;

    use clusterscope_aggregator::EntryStatus;
    use clusterscope_types::Verdict;

    use super::*;

    fn write(root: &Path, table: &str, file: &str, document: Value) {
        let dir = root.join(table);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), serde_json::to_vec(&document).unwrap()).unwrap();
    }

    #[test]
    fn page_size_must_be_offered() {
        assert_eq!(parse_page_size("50"), Ok(50));
        assert!(parse_page_size("30").is_err());
        assert!(parse_page_size("many").is_err());
    }

    #[test(tokio::test)]
    async fn facets_are_read_from_the_metadata_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "orders_OFFLINE",
            SIZE_FILE,
            json!({ "reportedSizeInBytes": 2048, "estimatedSizeInBytes": 4096, "tableName": "orders" }),
        );
        write(
            dir.path(),
            "orders_OFFLINE",
            STATE_FILE,
            json!({
                "idealState": { "OFFLINE": { "s1": { "server_1": "ONLINE" } } },
                "externalView": { "OFFLINE": { "s1": { "server_1": "OFFLINE" } } },
            }),
        );
        // no state.json
        write(
            dir.path(),
            "users_REALTIME",
            SIZE_FILE,
            json!({ "reportedSizeInBytes": 1, "estimatedSizeInBytes": 1 }),
        );

        let aggregator = MetadataAggregator::new(MetadataDir::new(dir.path()));
        let keys = vec!["orders_OFFLINE".to_owned(), "users_REALTIME".to_owned()];
        aggregator.request(keys.clone());
        aggregator.wait_settled(&keys).await;

        let orders = aggregator.get(&keys[0]).unwrap();
        assert_that!(orders.status(), eq(EntryStatus::Ready));
        let metadata = orders.value().unwrap();
        assert_eq!(metadata.reported_size(), 2048);
        assert_eq!(metadata.status(), Verdict::Bad);

        let users = aggregator.get(&keys[1]).unwrap();
        assert_that!(users.error_message(), some(eq("Failed to fetch state")));
        assert_eq!(users.value().unwrap().estimated_size(), 1);
    }

    #[test(tokio::test)]
    async fn table_names_cannot_leave_the_metadata_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("metadata");
        write(
            dir.path(),
            "outside",
            SIZE_FILE,
            json!({ "reportedSizeInBytes": 1, "estimatedSizeInBytes": 1 }),
        );

        let fetcher = MetadataDir::new(&root);
        for name in ["../outside", "a/b", "..", ".", "", "/etc"] {
            let err = fetcher.fetch_size(&name.to_owned()).await.unwrap_err();
            assert_that!(err.to_string(), contains_substring("invalid table name"));
            assert!(fetcher.fetch_state(&name.to_owned()).await.is_err());
        }
    }

    #[test(tokio::test)]
    async fn size_sort_loads_every_matching_table() {
        let dir = tempfile::tempdir().unwrap();
        let listing = json!({ "tables": ["a_OFFLINE", "b_OFFLINE", "c_OFFLINE"] });
        for (name, size) in [("a_OFFLINE", 10), ("b_OFFLINE", 30), ("c_OFFLINE", 20)] {
            write(
                dir.path(),
                name,
                SIZE_FILE,
                json!({ "reportedSizeInBytes": size, "estimatedSizeInBytes": size }),
            );
        }
        let tables = parse_table_listing(&listing);
        let query = TableQuery {
            sort: SortField::ReportedSize,
            order: SortOrder::Desc,
            page_size: 1,
            ..TableQuery::default()
        };

        let aggregator = MetadataAggregator::new(MetadataDir::new(dir.path()));
        let window = load_window(&query, &tables, &aggregator).await;

        let visible: Vec<&str> = window.keys().collect();
        assert_that!(visible, elements_are![eq("b_OFFLINE")]);
        assert_eq!(aggregator.len(), 3);
        assert_eq!(window.total_pages, 3);
    }
}
