// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use comfy_table::{Attribute, Cell, ContentArrangement, Table, modifiers, presets};

use crate::app::TableStyle;
use crate::cli_env::CliEnv;

/// Prints to stdout, ignoring errors such as a closed pipe.
macro_rules! c_println {
    () => {{
        use std::io::Write;
        let _ = writeln!(std::io::stdout().lock());
    }};
    ($($arg:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stdout().lock(), $($arg)*);
    }};
}

/// Prints to stderr, ignoring errors.
macro_rules! c_eprintln {
    ($($arg:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stderr().lock(), $($arg)*);
    }};
}

pub(crate) use {c_eprintln, c_println};

pub trait StyledTable {
    fn new_styled(env: &CliEnv) -> Self;
    fn set_styled_header<T: ToString>(&mut self, headers: Vec<T>) -> &mut Self;
    fn add_kv_row<V: Into<Cell>>(&mut self, key: &str, value: V) -> &mut Self;
}

impl StyledTable for Table {
    fn new_styled(env: &CliEnv) -> Self {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        match env.ui_config.table_style {
            TableStyle::Compact => {
                table.load_preset(presets::NOTHING);
            }
            TableStyle::Borders => {
                table.load_preset(presets::UTF8_FULL);
                table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
            }
        }
        if !env.colorful {
            table.force_no_tty();
        } else {
            table.enforce_styling();
        }
        table
    }

    fn set_styled_header<T: ToString>(&mut self, headers: Vec<T>) -> &mut Self {
        self.set_header(
            headers
                .into_iter()
                .map(|c| Cell::new(c.to_string()).add_attribute(Attribute::Bold)),
        )
    }

    fn add_kv_row<V: Into<Cell>>(&mut self, key: &str, value: V) -> &mut Self {
        self.add_row(vec![
            Cell::new(key).add_attribute(Attribute::Bold),
            value.into(),
        ])
    }
}
