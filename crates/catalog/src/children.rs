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

/// Children of a node in the coordination-service tree. The endpoint is expected to return an
/// array of names; anything else is treated as no children. Non-string entries are kept in
/// their json rendering.
pub fn normalize_children(raw: &Value) -> Vec<String> {
    let Some(children) = raw.as_array() else {
        return Vec::new();
    };

    children
        .iter()
        .map(|child| match child {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        })
        .collect()
}
