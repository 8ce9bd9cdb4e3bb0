//! Fixed-width rendering of query results for the terminal.
//!
//! Every column is printed as `|` followed by the value left-aligned in 20
//! characters. Longer values are not truncated, so they push the rest of the
//! line to the right.

use std::io::{self, Write};

use crate::db::gateway::ResultSet;

pub const COLUMN_WIDTH: usize = 20;

/// Write `result` to `out`: a header of column names and a dashed separator
/// before the first row, then one line per row. An empty result writes nothing.
pub fn render(result: &ResultSet, out: &mut (dyn Write + Send)) -> io::Result<()> {
    if result.is_empty() {
        return Ok(());
    }

    let mut header = String::new();
    let mut separator = String::new();
    for column in &result.columns {
        header.push_str(&cell(column));
        separator.push_str(&"-".repeat(COLUMN_WIDTH));
    }
    writeln!(out, "{header}")?;
    writeln!(out, "{separator}")?;

    for row in &result.rows {
        let line: String = row.iter().map(|field| cell(field.trim())).collect();
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn cell(value: &str) -> String {
    format!("|{value:<COLUMN_WIDTH$}")
}
