// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::Result;
use cling::prelude::*;
use comfy_table::Table;

use crate::cli_env::CliEnv;
use crate::ui::console::{StyledTable, c_eprintln, c_println};

#[derive(Run, Parser, Collect, Clone)]
#[cling(run = "run_clusters")]
pub struct Clusters {
    /// Also list the configured datasources
    #[clap(long)]
    datasources: bool,
}

pub async fn run_clusters(State(env): State<CliEnv>, opts: &Clusters) -> Result<()> {
    let clusters = env.config.cluster_registry();

    if clusters.is_empty() {
        c_eprintln!("No clusters are configured! Pass a configuration file with '--config'");
    } else {
        let mut table = Table::new_styled(&env);
        table.set_styled_header(vec!["ID", "URL", "HEADERS"]);
        for id in clusters.cluster_ids() {
            let Some(cluster) = clusters.get(id) else {
                continue;
            };
            // only header names, values may hold credentials
            let headers: Vec<&str> = cluster.headers.keys().map(String::as_str).collect();
            table.add_row(vec![id.to_owned(), cluster.url.clone(), headers.join(", ")]);
        }
        c_println!("{}", table);
    }

    if opts.datasources {
        let infos = env.config.datasource_registry().infos();
        if infos.is_empty() {
            c_eprintln!("No datasources are configured!");
            return Ok(());
        }

        let mut table = Table::new_styled(&env);
        table.set_styled_header(vec!["ID", "TYPE", "ICON"]);
        for info in infos {
            table.add_row(vec![info.id, info.ty.to_string(), info.icon]);
        }
        c_println!();
        c_println!("{}", table);
    }
    Ok(())
}
