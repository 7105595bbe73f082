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

use clusterscope_reconciler::{Reconciliation, reconcile};

use crate::cli_env::CliEnv;
use crate::commands::read_view;
use crate::ui::console::{StyledTable, c_println};
use crate::ui::render::render_verdict;

#[derive(Run, Parser, Collect, Clone)]
#[cling(run = "run_reconcile")]
pub struct Reconcile {
    /// Desired assignment (ideal state) of the table, as json
    #[clap(long)]
    desired: PathBuf,

    /// Observed assignment (external view) of the table, as json
    #[clap(long)]
    observed: PathBuf,

    /// Print the full comparison as json
    #[clap(long)]
    json: bool,
}

pub async fn run_reconcile(State(env): State<CliEnv>, opts: &Reconcile) -> Result<()> {
    let desired = read_view(&opts.desired).await?;
    let observed = read_view(&opts.observed).await?;
    let result = reconcile(&desired, &observed);

    if opts.json {
        c_println!("{}", reconciliation_json(&result)?);
        return Ok(());
    }

    let mut summary = Table::new_styled(&env);
    summary.add_kv_row("Verdict:", render_verdict(result.verdict));
    c_println!("{}", summary);

    let discrepancies = result.discrepancies();
    if discrepancies.is_empty() {
        return Ok(());
    }

    let mut table = Table::new_styled(&env);
    table.set_styled_header(vec!["PARTITION", "DISCREPANCY"]);
    for discrepancy in discrepancies {
        table.add_row(vec![
            discrepancy.partition().to_string(),
            discrepancy.to_string(),
        ]);
    }
    c_println!();
    c_println!("{}", table);
    Ok(())
}

fn reconciliation_json(result: &Reconciliation) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
