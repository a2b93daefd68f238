//! Cell data structures for the table grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellType`] - The type of content in a cell (empty, text, number, formula, colour)
//! - [`Validity`] - Outcome of syntax analysis for a formula cell
//! - [`Cell`] - A single grid cell
//! - [`Grid`] - Dense, fixed-size row-major cell storage

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cell_ref::{CellRef, MAX_COLS, MAX_ROWS};
use super::classify::is_number;
use super::format::format_number;

/// Character that introduces a formula unless configured otherwise.
pub const DEFAULT_MARKER: char = '=';

/// Syntax-analysis state of a formula cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    /// Not analysed yet.
    #[default]
    Default,
    Valid,
    Invalid,
}

/// The type of content stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellType {
    Empty,
    Text(String),
    Number(f64),
    /// Raw formula text, including its leading marker.
    Expression { text: String, validity: Validity },
    Colour(String),
}

/// A cell in the table grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub contents: CellType,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new_empty()
    }
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            contents: CellType::Empty,
        }
    }

    pub fn new_text(text: &str) -> Cell {
        Cell {
            contents: CellType::Text(text.to_string()),
        }
    }

    pub fn new_number(n: f64) -> Cell {
        Cell {
            contents: CellType::Number(n),
        }
    }

    /// Create a formula cell. `text` keeps its marker (e.g. `"=B1+B2"`).
    pub fn new_expression(text: &str) -> Cell {
        Cell {
            contents: CellType::Expression {
                text: text.to_string(),
                validity: Validity::Default,
            },
        }
    }

    pub fn new_colour(colour: &str) -> Cell {
        Cell {
            contents: CellType::Colour(colour.to_string()),
        }
    }

    /// Parse user input and create appropriate cell type.
    /// - Empty string or whitespace -> Empty
    /// - Starts with `marker` -> Expression (marker kept)
    /// - Numeric literal, `#INF!`, `-#INF!` or `#NAN!` -> Number
    /// - `#rrggbb` -> Colour
    /// - Otherwise -> Text
    pub fn from_input(input: &str, marker: char) -> Cell {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Cell::new_empty();
        }

        if trimmed.starts_with(marker) {
            return Cell::new_expression(trimmed);
        }

        if is_number(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return Cell::new_number(n);
            }
        }

        if let Some(n) = special_number(trimmed) {
            return Cell::new_number(n);
        }

        if is_colour(trimmed) {
            return Cell::new_colour(trimmed);
        }

        Cell::new_text(trimmed)
    }

    /// Get the input string for the cell content (for editing and export).
    pub fn to_input_string(&self) -> String {
        match &self.contents {
            CellType::Empty => String::new(),
            CellType::Text(s) | CellType::Colour(s) => s.clone(),
            CellType::Number(n) if n.is_finite() => n.to_string(),
            CellType::Number(n) => format_number(*n, 0),
            CellType::Expression { text, .. } => text.clone(),
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self.contents, CellType::Expression { .. })
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.contents {
            CellType::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn validity(&self) -> Option<Validity> {
        match self.contents {
            CellType::Expression { validity, .. } => Some(validity),
            _ => None,
        }
    }
}

/// Spellings [`format_number`] uses for non-finite values.
fn special_number(s: &str) -> Option<f64> {
    match s {
        "#INF!" => Some(f64::INFINITY),
        "-#INF!" => Some(f64::NEG_INFINITY),
        "#NAN!" => Some(f64::NAN),
        _ => None,
    }
}

fn is_colour(s: &str) -> bool {
    s.strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Errors raised by grid allocation and access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("This program only supports up to 999 rows (got {0})")]
    TooManyRows(usize),

    #[error("This program only supports up to 26 columns (got {0})")]
    TooManyColumns(usize),

    #[error("Cell {0} is outside the table")]
    OutOfBounds(CellRef),
}

/// Dense row-major storage for a fixed-size table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate an all-empty grid. Dimensions are fixed for the grid's lifetime.
    pub fn new(rows: usize, cols: usize) -> Result<Grid, GridError> {
        if rows > MAX_ROWS {
            return Err(GridError::TooManyRows(rows));
        }
        if cols > MAX_COLS {
            return Err(GridError::TooManyColumns(cols));
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::new_empty(); rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        cell_ref.row < self.rows && cell_ref.col < self.cols
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        if !self.contains(cell_ref) {
            return None;
        }
        self.cells.get(cell_ref.row * self.cols + cell_ref.col)
    }

    pub fn get_mut(&mut self, cell_ref: &CellRef) -> Option<&mut Cell> {
        if !self.contains(cell_ref) {
            return None;
        }
        self.cells.get_mut(cell_ref.row * self.cols + cell_ref.col)
    }

    /// Replace a cell, returning the previous one.
    pub fn set(&mut self, cell_ref: &CellRef, cell: Cell) -> Result<Cell, GridError> {
        let slot = self
            .get_mut(cell_ref)
            .ok_or(GridError::OutOfBounds(*cell_ref))?;
        Ok(std::mem::replace(slot, cell))
    }

    /// Iterate cells in row-major order together with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (CellRef, &Cell)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (CellRef::new(idx / cols, idx % cols), cell))
    }

    /// Number of formula cells currently in the grid.
    pub fn expression_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_expression()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_classification() {
        assert_eq!(Cell::from_input("  ", '='), Cell::new_empty());
        assert_eq!(Cell::from_input("=B1+B2", '='), Cell::new_expression("=B1+B2"));
        assert_eq!(Cell::from_input("-3.5", '='), Cell::new_number(-3.5));
        assert_eq!(Cell::from_input("#FF00aa", '='), Cell::new_colour("#FF00aa"));
        assert_eq!(Cell::from_input("#FF00", '='), Cell::new_text("#FF00"));
        assert_eq!(Cell::from_input("1e5", '='), Cell::new_text("1e5"));
        assert_eq!(Cell::from_input("total", '='), Cell::new_text("total"));
    }

    #[test]
    fn test_non_finite_numbers_keep_their_type() {
        for n in [f64::INFINITY, f64::NEG_INFINITY] {
            let text = Cell::new_number(n).to_input_string();
            assert_eq!(Cell::from_input(&text, '='), Cell::new_number(n));
        }
        let text = Cell::new_number(f64::NAN).to_input_string();
        assert_eq!(text, "#NAN!");
        assert!(Cell::from_input(&text, '=').as_number().is_some_and(f64::is_nan));
        assert_eq!(Cell::from_input("#INF", '='), Cell::new_text("#INF"));
    }

    #[test]
    fn test_from_input_custom_marker() {
        assert_eq!(Cell::from_input("@A0*2", '@'), Cell::new_expression("@A0*2"));
        assert_eq!(Cell::from_input("=A0*2", '@'), Cell::new_text("=A0*2"));
    }

    #[test]
    fn test_grid_bounds() {
        assert_eq!(Grid::new(1000, 1), Err(GridError::TooManyRows(1000)));
        assert_eq!(Grid::new(1, 27), Err(GridError::TooManyColumns(27)));

        let mut grid = Grid::new(2, 3).unwrap();
        assert!(grid.get(&CellRef::new(1, 2)).is_some());
        assert!(grid.get(&CellRef::new(2, 0)).is_none());
        assert_eq!(
            grid.set(&CellRef::new(0, 3), Cell::new_number(1.0)),
            Err(GridError::OutOfBounds(CellRef::new(0, 3)))
        );
    }

    #[test]
    fn test_iter_is_row_major() {
        let grid = Grid::new(2, 2).unwrap();
        let coords: Vec<_> = grid.iter().map(|(r, _)| r.to_string()).collect();
        assert_eq!(coords, vec!["A0", "B0", "A1", "B1"]);
    }

    #[test]
    fn test_expression_count() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(&CellRef::new(0, 0), Cell::new_expression("=1")).unwrap();
        grid.set(&CellRef::new(1, 1), Cell::new_expression("=B0")).unwrap();
        grid.set(&CellRef::new(0, 1), Cell::new_number(2.0)).unwrap();
        assert_eq!(grid.expression_count(), 2);
    }
}
