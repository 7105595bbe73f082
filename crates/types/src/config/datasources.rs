// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{RegistryError, env_lookup, resolve_headers};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DatasourceType {
    /// A single cluster's query endpoint
    #[default]
    Cluster,
    /// A federation endpoint spanning several clusters
    Federated,
}

/// # Datasource
///
/// Query endpoint usable from the SQL console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceConfig {
    #[serde(rename = "type", default)]
    pub ty: DatasourceType,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub icon: String,
}

/// Public part of a datasource's configuration, without url and headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub ty: DatasourceType,
    pub icon: String,
}

#[derive(Debug, Clone, Default)]
pub struct DatasourceRegistry {
    datasources: BTreeMap<String, DatasourceConfig>,
}

impl DatasourceRegistry {
    pub fn new(datasources: BTreeMap<String, DatasourceConfig>) -> Self {
        Self { datasources }
    }

    pub fn datasource_ids(&self) -> Vec<&str> {
        self.datasources.keys().map(String::as_str).collect()
    }

    pub fn infos(&self) -> Vec<DatasourceInfo> {
        self.datasources
            .iter()
            .map(|(id, ds)| DatasourceInfo {
                id: id.clone(),
                ty: ds.ty,
                icon: ds.icon.clone(),
            })
            .collect()
    }

    pub fn get(&self, datasource_id: &str) -> Option<&DatasourceConfig> {
        self.datasources.get(datasource_id)
    }

    pub fn resolved(&self, datasource_id: &str) -> Result<DatasourceConfig, RegistryError> {
        self.resolve_with(datasource_id, env_lookup)
    }

    pub fn resolve_with(
        &self,
        datasource_id: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<DatasourceConfig, RegistryError> {
        let config = self
            .get(datasource_id)
            .ok_or_else(|| RegistryError::UnknownDatasource(datasource_id.to_owned()))?;

        Ok(DatasourceConfig {
            headers: resolve_headers(&config.headers, &lookup),
            ..config.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn infos_hide_endpoint_details() {
        let datasources: BTreeMap<String, DatasourceConfig> = serde_json::from_value(json!({
            "eu": {
                "type": "cluster",
                "url": "http://eu:8099",
                "headers": { "Authorization": "${EU_TOKEN}" },
                "icon": "eu.svg"
            },
            "global": { "type": "federated", "url": "http://global:8099", "icon": "globe.svg" }
        }))
        .unwrap();
        let registry = DatasourceRegistry::new(datasources);

        assert_eq!(
            registry.infos(),
            vec![
                DatasourceInfo {
                    id: "eu".to_owned(),
                    ty: DatasourceType::Cluster,
                    icon: "eu.svg".to_owned()
                },
                DatasourceInfo {
                    id: "global".to_owned(),
                    ty: DatasourceType::Federated,
                    icon: "globe.svg".to_owned()
                },
            ]
        );

        let resolved = registry.resolve_with("eu", |_| None).unwrap();
        assert_eq!(resolved.headers["Authorization"], "");
        assert_eq!(resolved.url, "http://eu:8099");
        assert_eq!(
            registry.resolve_with("us", |_| None).unwrap_err().to_string(),
            "Datasource 'us' not found"
        );
    }
}
