//! Console and JSON rendering of result tables.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::table::ResultTable;

/// Render a table for the terminal: the title on its own line, then a
/// bordered grid. A table without columns renders as its title alone.
pub fn render_table(table: &ResultTable) -> String {
    if table.columns().is_empty() {
        return table.title().to_string();
    }

    let mut grid = Table::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(table.columns());
    for row in table.rows() {
        grid.add_row(row);
    }

    format!("{}\n{}", table.title(), grid)
}

/// Render a table as pretty-printed JSON.
pub fn render_json(table: &ResultTable) -> serde_json::Result<String> {
    serde_json::to_string_pretty(table)
}
