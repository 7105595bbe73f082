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

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use tracing::{debug, info};

use crate::config::{InvalidConfigurationError, RegistryConfiguration};

#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error("configuration loading error: {0}")]
    Figment(Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfigurationError),
}

// Because thiserror doesn't support auto-boxing or auto implements From with boxing.
impl From<figment::Error> for ConfigLoadError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}

/// Loads a [`RegistryConfiguration`] out of defaults, any number of configuration files and,
/// optionally, the environment. Later sources override earlier ones.
///
/// Files ending in `.toml` are read as toml, everything else as json.
#[derive(Debug, Default, derive_builder::Builder)]
#[builder(default)]
pub struct ConfigLoader {
    #[builder(setter(each(name = "path", into)))]
    paths: Vec<PathBuf>,
    load_env: bool,
    #[builder(setter(strip_option))]
    custom_default: Option<RegistryConfiguration>,
}

impl ConfigLoader {
    pub fn load_once(&self) -> Result<RegistryConfiguration, ConfigLoadError> {
        let defaults = self.custom_default.clone().unwrap_or_default();

        let mut figment = Figment::from(Serialized::defaults(defaults));
        for path in &self.paths {
            debug!("Merging configuration file {}", path.display());
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file_exact(path.as_path())),
                _ => figment.merge(Json::file_exact(path.as_path())),
            };
        }

        // Merge with environment variables
        if self.load_env {
            figment = Self::merge_with_env(figment);
        }

        let config: RegistryConfiguration = figment.extract()?;
        config.validate()?;

        info!(
            clusters = config.clusters.len(),
            datasources = config.datasources.len(),
            "Loaded registry configuration"
        );
        Ok(config)
    }

    fn merge_with_env(figment: Figment) -> Figment {
        figment
            .merge(
                Env::prefixed("CLUSTERSCOPE_")
                    .split("__")
                    .map(|k| k.as_str().replace('_', "-").into()),
            )
            // Override log-filter with RUST_LOG, if present
            .merge(Env::raw().only(&["RUST_LOG"]).map(|_| "log-filter".into()))
    }
}
