// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use comfy_table::{Cell, Color};

use clusterscope_aggregator::{AggregationEntry, EntryStatus};
use clusterscope_catalog::format_bytes;
use clusterscope_types::{TableMetadata, Verdict};

pub fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Good => Color::Green,
        Verdict::Bad => Color::Red,
        Verdict::Unknown => Color::DarkGrey,
    }
}

pub fn render_verdict(verdict: Verdict) -> Cell {
    Cell::new(verdict.as_str()).fg(verdict_color(verdict))
}

/// Size column of a table; `-` while the size facet is unknown.
pub fn render_size(size: Option<i64>) -> String {
    size.map(format_bytes).unwrap_or_else(|| "-".to_owned())
}

/// Status column of a table: the verdict once known, otherwise the state of the fetch.
pub fn render_table_status(entry: Option<&AggregationEntry<TableMetadata>>) -> Cell {
    match entry {
        Some(entry) => match entry.value().and_then(|metadata| metadata.state) {
            Some(state) => render_verdict(state.status),
            None if entry.status() == EntryStatus::Pending => Cell::new("LOADING"),
            None => render_verdict(Verdict::Unknown),
        },
        None => render_verdict(Verdict::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sizes_render_as_dash() {
        assert_eq!(render_size(None), "-");
        assert_eq!(render_size(Some(1536)), "1.5 KB");
    }
}
