// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod clusters;
mod datasources;
mod logging;

pub use clusters::*;
pub use datasources::*;
pub use logging::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum InvalidConfigurationError {
    #[error("cluster '{0}' has an empty url")]
    EmptyClusterUrl(String),
    #[error("datasource '{0}' has an empty url")]
    EmptyDatasourceUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Cluster '{0}' not found")]
    UnknownCluster(String),
    #[error("Datasource '{0}' not found")]
    UnknownDatasource(String),
}

/// # Clusterscope configuration
///
/// Cluster and datasource registries plus the logging options of the process. The registries
/// are usually spread over two files (`clusters.json` and `datasources.json`) which the
/// [`crate::config_loader::ConfigLoader`] merges into a single configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[serde(rename_all = "kebab-case", default)]
#[builder(default)]
pub struct RegistryConfiguration {
    pub clusters: BTreeMap<String, ClusterConfig>,
    pub datasources: BTreeMap<String, DatasourceConfig>,
    #[serde(flatten)]
    pub logging: LoggingOptions,
}

impl RegistryConfiguration {
    pub fn validate(&self) -> Result<(), InvalidConfigurationError> {
        if let Some((id, _)) = self.clusters.iter().find(|(_, c)| c.url.trim().is_empty()) {
            return Err(InvalidConfigurationError::EmptyClusterUrl(id.clone()));
        }
        if let Some((id, _)) = self
            .datasources
            .iter()
            .find(|(_, d)| d.url.trim().is_empty())
        {
            return Err(InvalidConfigurationError::EmptyDatasourceUrl(id.clone()));
        }
        Ok(())
    }

    pub fn cluster_registry(&self) -> ClusterRegistry {
        ClusterRegistry::new(self.clusters.clone())
    }

    pub fn datasource_registry(&self) -> DatasourceRegistry {
        DatasourceRegistry::new(self.datasources.clone())
    }
}

/// Replaces every `${NAME}` in `value` with what `lookup` returns for `NAME`, or with nothing
/// if it returns `None`. `NAME` must be made of ascii alphanumerics and underscores, anything
/// else is left untouched.
pub fn resolve_env_placeholders(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());

        if name_len > 0 && after[name_len..].starts_with('}') {
            out.push_str(&lookup(&after[..name_len]).unwrap_or_default());
            rest = &after[name_len + 1..];
        } else {
            out.push_str("${");
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

fn resolve_headers(
    headers: &BTreeMap<String, String>,
    lookup: &impl Fn(&str) -> Option<String>,
) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_env_placeholders(v, lookup)))
        .collect()
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "TOKEN" => Some("s3cr3t".to_owned()),
            "TENANT_1" => Some("acme".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn placeholders_are_substituted() {
        assert_eq!(
            resolve_env_placeholders("Bearer ${TOKEN}", lookup),
            "Bearer s3cr3t"
        );
        assert_eq!(
            resolve_env_placeholders("${TENANT_1}/${TOKEN}", lookup),
            "acme/s3cr3t"
        );
    }

    #[test]
    fn unset_variables_resolve_to_empty() {
        assert_eq!(resolve_env_placeholders("x-${MISSING}-y", lookup), "x--y");
    }

    #[test]
    fn malformed_placeholders_are_kept() {
        assert_eq!(resolve_env_placeholders("${}", lookup), "${}");
        assert_eq!(resolve_env_placeholders("${TOKEN", lookup), "${TOKEN");
        assert_eq!(resolve_env_placeholders("${A-B}", lookup), "${A-B}");
        assert_eq!(resolve_env_placeholders("$TOKEN", lookup), "$TOKEN");
        assert_eq!(resolve_env_placeholders("$${TOKEN}", lookup), "$s3cr3t");
    }

    #[test]
    fn empty_urls_are_rejected() {
        let mut config = RegistryConfiguration::default();
        config.clusters.insert(
            "prod".to_owned(),
            ClusterConfig {
                url: " ".to_owned(),
                headers: Default::default(),
            },
        );

        assert!(matches!(
            config.validate(),
            Err(InvalidConfigurationError::EmptyClusterUrl(id)) if id == "prod"
        ));
    }
}
