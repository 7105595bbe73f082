// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;
use tracing::debug;

use clusterscope_types::{TableEntity, TableKind};

/// Splits a raw table name into its display name and kind. The first matching suffix out of
/// `_REALTIME`, `_OFFLINE` and `_DIMENSION` is stripped. Names without a recognized suffix are
/// kept as they are with [`TableKind::Unknown`].
pub fn parse_entity_name(raw: &str) -> TableEntity {
    for kind in TableKind::SUFFIXED {
        let Some(suffix) = kind.suffix() else {
            continue;
        };
        if let Some(display_name) = raw.strip_suffix(suffix) {
            return TableEntity {
                raw_name: raw.to_owned(),
                display_name: display_name.to_owned(),
                kind,
            };
        }
    }

    TableEntity {
        raw_name: raw.to_owned(),
        display_name: raw.to_owned(),
        kind: TableKind::Unknown,
    }
}

/// Parses the `{ "tables": [...] }` document of the table listing endpoint. Entries that are
/// not strings are skipped and a document without a `tables` array yields no tables.
pub fn parse_table_listing(document: &Value) -> Vec<TableEntity> {
    let Some(tables) = document.get("tables").and_then(Value::as_array) else {
        debug!("Table listing has no 'tables' array");
        return Vec::new();
    };

    tables
        .iter()
        .filter_map(Value::as_str)
        .map(parse_entity_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use clusterscope_test_util::assert_eq;
    use serde_json::json;

    #[test]
    fn strips_known_suffixes() {
        let entity = parse_entity_name("orders_REALTIME");
        assert_eq!(entity.display_name, "orders");
        assert_eq!(entity.kind, TableKind::Realtime);
        assert_eq!(entity.raw_name, "orders_REALTIME");

        assert_eq!(parse_entity_name("orders_OFFLINE").kind, TableKind::Offline);
        assert_eq!(
            parse_entity_name("currencies_DIMENSION").display_name,
            "currencies"
        );
    }

    #[test]
    fn unknown_suffix_keeps_the_name() {
        let entity = parse_entity_name("orders");
        assert_eq!(entity.display_name, "orders");
        assert_eq!(entity.kind, TableKind::Unknown);

        // suffixes are case sensitive and must be at the very end
        assert_eq!(parse_entity_name("orders_realtime").kind, TableKind::Unknown);
        assert_eq!(
            parse_entity_name("orders_OFFLINE_v2").kind,
            TableKind::Unknown
        );
    }

    #[test]
    fn only_the_last_suffix_is_stripped() {
        let entity = parse_entity_name("events_OFFLINE_REALTIME");
        assert_eq!(entity.display_name, "events_OFFLINE");
        assert_eq!(entity.kind, TableKind::Realtime);
    }

    #[test]
    fn display_names_may_collide() {
        let realtime = parse_entity_name("orders_REALTIME");
        let offline = parse_entity_name("orders_OFFLINE");

        assert_eq!(realtime.display_name, offline.display_name);
        assert_ne!(realtime.raw_name, offline.raw_name);
    }

    #[test]
    fn table_listing() {
        let tables = parse_table_listing(&json!({
            "tables": ["orders_REALTIME", 7, "users"]
        }));
        assert_eq!(
            tables
                .iter()
                .map(|t| t.raw_name.as_str())
                .collect::<Vec<_>>(),
            vec!["orders_REALTIME", "users"]
        );

        assert!(parse_table_listing(&json!({ "tables": "nope" })).is_empty());
        assert!(parse_table_listing(&json!([])).is_empty());
    }
}
