//! Token classification.
//!
//! A formula token is either a numeric literal, a reference to a cell that
//! exists in the current grid, or neither. Reference checks report *why* a
//! token failed so the validator can name the bad column or row.

use super::cell_ref::{CellRef, letter_to_col, split_address};

/// Outcome of classifying a token as a cell reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefClass {
    /// In-bounds reference.
    Ref(CellRef),
    /// Not shaped like `<Letter><Digits>`.
    NotARef,
    /// Well-formed, but the column is past the grid's last column.
    ColumnOutOfBounds,
    /// Well-formed, but the row is past the grid's last row.
    RowOutOfBounds,
}

/// Numeric literal: optional leading `-`, a digit, then digits with at most
/// one `.`.
pub fn is_number(token: &str) -> bool {
    let body = token.strip_prefix('-').unwrap_or(token);
    if !body.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    let mut periods = 0;
    for c in body.chars() {
        if c == '.' {
            periods += 1;
            if periods > 1 {
                return false;
            }
        } else if !c.is_ascii_digit() {
            return false;
        }
    }
    true
}

/// Classify `token` as a reference into a `rows` × `cols` grid.
pub fn classify_ref(token: &str, rows: usize, cols: usize) -> RefClass {
    let Some(raw) = split_address(token) else {
        return RefClass::NotARef;
    };

    let col = letter_to_col(raw.letter);
    if col >= cols {
        return RefClass::ColumnOutOfBounds;
    }

    match raw.row {
        Some(row) if row < rows => RefClass::Ref(CellRef::new(row, col)),
        _ => RefClass::RowOutOfBounds,
    }
}
