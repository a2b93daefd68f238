//! Parser for delimited table files.
//!
//! One grid row per line, cells separated by the configured delimiter. A
//! single trailing delimiter does not open a new cell, so `1|2|` has two
//! cells. Blank lines still count as rows.

use crate::error::{Result, TabsolveError};
use std::fs;
use std::path::Path;
use tabsolve_engine::engine::{Cell, CellRef, Grid, MAX_COLS, MAX_ROWS};

/// A grid read from a table file plus the number of formula cells in it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTable {
    pub grid: Grid,
    pub expression_count: usize,
}

/// Parse a table file.
pub fn parse_table(path: &Path, delimiter: char, marker: char) -> Result<ParsedTable> {
    let content = fs::read_to_string(path)?;
    parse_table_content(&content, delimiter, marker)
}

/// Parse table content from a string.
pub fn parse_table_content(content: &str, delimiter: char, marker: char) -> Result<ParsedTable> {
    let lines: Vec<Vec<&str>> = content
        .lines()
        .map(|line| split_row(line, delimiter))
        .collect();

    let rows = lines.len();
    if rows > MAX_ROWS {
        return Err(TabsolveError::Parse {
            line: MAX_ROWS + 1,
            message: format!("Only {} rows are supported", MAX_ROWS),
        });
    }

    let mut cols = 0;
    for (line_num, fields) in lines.iter().enumerate() {
        if fields.len() > MAX_COLS {
            return Err(TabsolveError::Parse {
                line: line_num + 1,
                message: format!(
                    "{} cells in row, only {} columns are supported",
                    fields.len(),
                    MAX_COLS
                ),
            });
        }
        cols = cols.max(fields.len());
    }

    let mut grid = Grid::new(rows, cols)?;
    let mut expression_count = 0;

    for (row, fields) in lines.iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            let cell = Cell::from_input(field, marker);
            if cell.is_expression() {
                expression_count += 1;
            }
            grid.set(&CellRef::new(row, col), cell)?;
        }
    }

    log::debug!(
        "parsed table: {} rows, {} cols, {} formulas",
        rows,
        cols,
        expression_count
    );

    Ok(ParsedTable {
        grid,
        expression_count,
    })
}

fn split_row(line: &str, delimiter: char) -> Vec<&str> {
    let line = line.trim_end();
    if line.is_empty() {
        return Vec::new();
    }
    let line = line.strip_suffix(delimiter).unwrap_or(line);
    line.split(delimiter).map(str::trim).collect()
}
