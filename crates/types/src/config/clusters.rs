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

/// # Cluster
///
/// Management endpoint of one cluster and the headers to send along with every request.
/// Header values may reference environment variables as `${NAME}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Registry of the configured clusters. Constructed once from the loaded configuration and
/// handed to whoever needs to address a cluster.
#[derive(Debug, Clone, Default)]
pub struct ClusterRegistry {
    clusters: BTreeMap<String, ClusterConfig>,
}

impl ClusterRegistry {
    pub fn new(clusters: BTreeMap<String, ClusterConfig>) -> Self {
        Self { clusters }
    }

    /// Cluster ids, sorted.
    pub fn cluster_ids(&self) -> Vec<&str> {
        self.clusters.keys().map(String::as_str).collect()
    }

    pub fn get(&self, cluster_id: &str) -> Option<&ClusterConfig> {
        self.clusters.get(cluster_id)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Returns a copy of the cluster's configuration with `${NAME}` placeholders in header
    /// values replaced from the process environment.
    pub fn resolved(&self, cluster_id: &str) -> Result<ClusterConfig, RegistryError> {
        self.resolve_with(cluster_id, env_lookup)
    }

    pub fn resolve_with(
        &self,
        cluster_id: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<ClusterConfig, RegistryError> {
        let config = self
            .get(cluster_id)
            .ok_or_else(|| RegistryError::UnknownCluster(cluster_id.to_owned()))?;

        Ok(ClusterConfig {
            url: config.url.clone(),
            headers: resolve_headers(&config.headers, &lookup),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn registry() -> ClusterRegistry {
        let clusters: BTreeMap<String, ClusterConfig> = serde_json::from_value(json!({
            "staging": { "url": "http://staging:9000" },
            "prod": {
                "url": "https://prod:9000",
                "headers": { "Authorization": "Bearer ${PROD_TOKEN}", "X-Static": "1" }
            }
        }))
        .unwrap();
        ClusterRegistry::new(clusters)
    }

    #[test]
    fn ids_are_sorted() {
        assert_eq!(registry().cluster_ids(), vec!["prod", "staging"]);
    }

    #[test]
    fn resolves_header_placeholders() {
        let resolved = registry()
            .resolve_with("prod", |name| {
                (name == "PROD_TOKEN").then(|| "abc".to_owned())
            })
            .unwrap();

        assert_eq!(resolved.url, "https://prod:9000");
        assert_eq!(resolved.headers["Authorization"], "Bearer abc");
        assert_eq!(resolved.headers["X-Static"], "1");
    }

    #[test]
    fn registry_is_not_mutated_by_resolution() {
        let registry = registry();
        let _ = registry.resolve_with("prod", |_| Some("abc".to_owned()));

        assert_eq!(
            registry.get("prod").unwrap().headers["Authorization"],
            "Bearer ${PROD_TOKEN}"
        );
    }

    #[test]
    fn unknown_cluster() {
        let err = registry().resolve_with("dev", |_| None).unwrap_err();
        assert_eq!(err, RegistryError::UnknownCluster("dev".to_owned()));
        assert_eq!(err.to_string(), "Cluster 'dev' not found");
    }
}
