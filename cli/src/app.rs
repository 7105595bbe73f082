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
use clap_verbosity_flag::LogLevel;
use cling::prelude::*;
use tracing::info;
use tracing_log::AsTrace;

use clusterscope_tracing_instrumentation::init_logging;
use clusterscope_types::config::{LogFormat, LoggingOptions};

use crate::cli_env::CliEnv;
use crate::commands::*;

#[derive(Run, Parser, Clone)]
#[command(author, version, about, infer_subcommands = true)]
#[cling(run = "init")]
pub struct CliApp {
    #[clap(flatten)]
    #[cling(collect)]
    pub verbose: clap_verbosity_flag::Verbosity<Quiet>,
    #[clap(flatten)]
    pub global_opts: GlobalOpts,
    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Clone, Default)]
pub struct UiConfig {
    /// Which table output style to use
    #[arg(long, default_value = "compact", global = true)]
    pub table_style: TableStyle,
}

#[derive(ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    #[default]
    /// No borders, condensed layout
    Compact,
    /// UTF8 borders, good for multiline text
    Borders,
}

#[derive(Args, Collect, Clone, Default)]
pub struct GlobalOpts {
    /// Registry configuration file, json or toml. Can be repeated; later files override earlier
    /// ones. `CLUSTERSCOPE_*` environment variables are applied on top.
    #[arg(long = "config", short = 'c', global = true)]
    pub config_paths: Vec<PathBuf>,

    #[clap(flatten)]
    pub ui_config: UiConfig,
}

#[derive(Run, Subcommand, Clone)]
pub enum Command {
    /// Compares the desired segment assignment of a table with the observed one
    Reconcile(reconcile::Reconcile),
    /// Lists tables together with their sizes and health
    Tables(tables::Tables),
    /// Lists the segments of a table
    Segments(segments::Segments),
    /// Lists the configured clusters and datasources
    Clusters(clusters::Clusters),
}

fn init(
    Collected(verbosity): Collected<clap_verbosity_flag::Verbosity<Quiet>>,
    global_opts: &GlobalOpts,
) -> Result<State<CliEnv>> {
    let mut env = CliEnv::load(global_opts)?;

    env.config.logging = cli_logging(&verbosity, &env.config.logging, env.colorful);
    init_logging(&env.config.logging)?;

    // We only log after we've initialized the logger with the desired log level.
    if global_opts.config_paths.is_empty() {
        info!("No configuration file given, using defaults and environment");
    } else {
        for path in &global_opts.config_paths {
            info!("Loaded configuration from {}", path.display());
        }
    }

    Ok(State(env))
}

/// Logging of the command line tool is driven by `-v` only and never shares stdout with the
/// command output.
fn cli_logging(
    verbosity: &clap_verbosity_flag::Verbosity<Quiet>,
    configured: &LoggingOptions,
    colorful: bool,
) -> LoggingOptions {
    LoggingOptions {
        log_filter: verbosity.log_level_filter().as_trace().to_string(),
        log_format: LogFormat::Compact,
        log_disable_ansi_codes: configured.log_disable_ansi_codes || !colorful,
    }
}

/// Silent (no) logging by default in CLI
#[derive(Clone)]
pub struct Quiet;
impl LogLevel for Quiet {
    fn default() -> Option<tracing_log::log::Level> {
        None
    }
}

#[cfg(test)]
mod tests {
    use clap_verbosity_flag::Verbosity;
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn logging_is_off_without_verbose_flags() {
        let opts = cli_logging(&Verbosity::new(0, 0), &LoggingOptions::default(), true);

        assert_that!(opts.log_filter.as_str(), eq("off"));
        assert_that!(opts.log_format, eq(LogFormat::Compact));
        assert_that!(opts.log_disable_ansi_codes, eq(false));
    }

    #[test]
    fn verbose_flags_raise_the_level() {
        let opts = cli_logging(&Verbosity::new(3, 0), &LoggingOptions::default(), false);

        assert_that!(opts.log_filter.as_str(), eq("info"));
        assert_that!(opts.log_format, eq(LogFormat::Compact));
        assert_that!(opts.log_disable_ansi_codes, eq(true));
    }
}
