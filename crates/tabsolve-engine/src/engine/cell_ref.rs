//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between table-style cell references
//! (e.g., "A0", "B12", "Z998") and zero-indexed column/row coordinates.
//! Columns are a single uppercase letter; rows are written 0-based, so the
//! top-left cell is `A0`.
//!
//! # Examples
//!
//! ```
//! use tabsolve_engine::engine::CellRef;
//!
//! let cell = CellRef::from_str("B3").unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Largest number of rows a grid may have.
pub const MAX_ROWS: usize = 999;
/// Largest number of columns a grid may have (A through Z).
pub const MAX_COLS: usize = 26;

/// A reference to a cell by column and row indices (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

/// Address split into its letter and row number, before any bounds check.
pub(crate) struct RawAddress {
    pub letter: char,
    pub row: Option<usize>,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell reference from table notation (e.g., "A0", "B2").
    /// Returns None if the input is not a reference or exceeds the
    /// addressable range (26 columns, 999 rows).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: &str) -> Option<CellRef> {
        let raw = split_address(name)?;
        let col = letter_to_col(raw.letter);
        let row = raw.row.filter(|row| *row < MAX_ROWS)?;
        Some(CellRef::new(row, col))
    }

    /// Convert a column index to its letter (0 -> A, 25 -> Z).
    /// Indices beyond Z render as `?`; grids never allocate them.
    pub fn col_to_letter(col: usize) -> char {
        if col < MAX_COLS {
            (b'A' + col as u8) as char
        } else {
            '?'
        }
    }
}

pub(crate) fn letter_to_col(letter: char) -> usize {
    (letter as u8 - b'A') as usize
}

/// Split `B12` into `('B', Some(12))`. The row is `None` when the digits
/// overflow `usize`.
pub(crate) fn split_address(token: &str) -> Option<RawAddress> {
    let caps = address_re().captures(token)?;
    let letter = caps["letter"].chars().next()?;
    let row = caps["row"].parse::<usize>().ok();
    Some(RawAddress { letter, row })
}

fn address_re() -> &'static Regex {
    static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();
    ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^(?<letter>[A-Z])(?<row>[0-9]+)$").expect("cell address regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::from_str(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CellRef::col_to_letter(self.col), self.row)
    }
}
