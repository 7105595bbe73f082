// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use anyhow::Result;
use cling::prelude::*;
use comfy_table::Table;

use clusterscope_catalog::{normalize_segment_list, replicas_for_segment};
use clusterscope_types::ClusterView;

use crate::cli_env::CliEnv;
use crate::commands::{read_json, read_view};
use crate::ui::console::{StyledTable, c_eprintln, c_println};

#[derive(Run, Parser, Collect, Clone)]
#[cling(run = "run_segments")]
pub struct Segments {
    /// Segment listing of a table, in any of the shapes the cluster returns
    #[clap(long)]
    file: PathBuf,

    /// Observed assignment (external view) to show the replicas of every segment from
    #[clap(long)]
    observed: Option<PathBuf>,
}

pub async fn run_segments(State(env): State<CliEnv>, opts: &Segments) -> Result<()> {
    let segments = normalize_segment_list(&read_json(&opts.file).await?);
    if segments.is_empty() {
        c_eprintln!("No segments were found in {}", opts.file.display());
        return Ok(());
    }

    let observed: Option<ClusterView> = match &opts.observed {
        Some(path) => Some(read_view(path).await?),
        None => None,
    };

    let mut table = Table::new_styled(&env);
    let mut header = vec!["NAME", "PARTITION", "STATUS"];
    if observed.is_some() {
        header.push("REPLICAS");
    }
    table.set_styled_header(header);

    for segment in segments {
        let mut row = vec![
            segment.name.clone(),
            segment.partition_kind.to_string(),
            segment.status.unwrap_or_else(|| "-".to_owned()),
        ];
        if let Some(observed) = &observed {
            let replicas = replicas_for_segment(observed, segment.partition_kind, &segment.name);
            row.push(
                replicas
                    .into_iter()
                    .map(|r| format!("{} ({})", r.replica, r.state))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        table.add_row(row);
    }
    c_println!("{}", table);
    Ok(())
}
