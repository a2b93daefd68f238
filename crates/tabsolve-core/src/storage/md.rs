//! Markdown export.

use crate::document::Document;
use crate::error::Result;
use std::fmt::Write as _;
use std::path::Path;
use tabsolve_engine::engine::CellRef;

/// Write the table to a markdown file using display values.
pub fn write_markdown(path: &Path, doc: &Document) -> Result<()> {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Table");
    std::fs::write(path, markdown_content(doc, title))?;
    Ok(())
}

/// Render the table as a markdown document with column letters across the
/// top and row numbers down the side.
pub fn markdown_content(doc: &Document, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", title);
    let _ = writeln!(out);

    let grid = &doc.grid;
    if grid.rows() == 0 || grid.cols() == 0 {
        let _ = writeln!(out, "*Empty table*");
        return out;
    }

    out.push_str("|   |");
    for col in 0..grid.cols() {
        let _ = write!(out, " {} |", CellRef::col_to_letter(col));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in 0..grid.cols() {
        out.push_str("---|");
    }
    out.push('\n');

    for row in 0..grid.rows() {
        let _ = write!(out, "| {} |", row);
        for col in 0..grid.cols() {
            let display = doc.get_cell_display(&CellRef::new(row, col));
            let _ = write!(out, " {} |", escape_markdown(&display));
        }
        out.push('\n');
    }

    out
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
