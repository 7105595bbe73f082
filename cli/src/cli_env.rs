// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::io::IsTerminal;

use anyhow::{Context, Result};

use clusterscope_types::config::RegistryConfiguration;
use clusterscope_types::config_loader::ConfigLoaderBuilder;

use crate::app::{GlobalOpts, UiConfig};

/// Everything commands need from the invocation's environment.
#[derive(Clone, Default)]
pub struct CliEnv {
    pub config: RegistryConfiguration,
    pub ui_config: UiConfig,
    pub colorful: bool,
}

impl CliEnv {
    pub fn load(global_opts: &GlobalOpts) -> Result<Self> {
        let config = ConfigLoaderBuilder::default()
            .paths(global_opts.config_paths.clone())
            .load_env(true)
            .build()?
            .load_once()
            .context("Failed to load the registry configuration")?;

        // We respect NO_COLOR if set, otherwise, we default to colorful unless
        // stdout is not a terminal
        let colorful = std::env::var("NO_COLOR").map_or(true, |x| x == "0");
        let colorful = colorful && std::io::stdout().is_terminal();

        Ok(Self {
            config,
            ui_config: global_opts.ui_config.clone(),
            colorful,
        })
    }
}
