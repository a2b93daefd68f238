//! Formula syntax validation.
//!
//! A formula body is split on operator characters into operand tokens. A
//! leading `-` on an operand is unary negation, not an operator. Every
//! operand must be a numeric literal or an in-bounds cell reference; the
//! first bad operand makes the whole cell invalid.
//!
//! Validation never aborts a solve: each bad cell yields one [`SyntaxError`]
//! and the rest of the grid is still analysed.

use thiserror::Error;

use super::cell::{CellType, Grid, Validity};
use super::cell_ref::CellRef;
use super::classify::{RefClass, classify_ref, is_number};
use super::eval::{Element, Operator};

/// A formula that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("[SYNTAX ERROR] Empty expression in cell {cell}.")]
    EmptyExpression { cell: CellRef },

    #[error("[SYNTAX ERROR] Dangling operator in cell {cell}: \"{text}\"")]
    DanglingOperator { cell: CellRef, text: String },

    #[error("[SYNTAX ERROR] Invalid expression in cell {cell}: \"{text}\"")]
    InvalidToken {
        cell: CellRef,
        text: String,
        token: String,
    },

    #[error(
        "[OOB ERROR] Cell {token} used in expression in {cell} but column {column} doesn't exist in the table."
    )]
    ColumnOutOfBounds {
        cell: CellRef,
        token: String,
        column: char,
    },

    #[error(
        "[OOB ERROR] Cell {token} used in expression in {cell} but row {row} doesn't exist in the table."
    )]
    RowOutOfBounds {
        cell: CellRef,
        token: String,
        row: String,
    },
}

impl SyntaxError {
    /// The formula cell that failed validation.
    pub fn cell(&self) -> CellRef {
        match self {
            SyntaxError::EmptyExpression { cell }
            | SyntaxError::DanglingOperator { cell, .. }
            | SyntaxError::InvalidToken { cell, .. }
            | SyntaxError::ColumnOutOfBounds { cell, .. }
            | SyntaxError::RowOutOfBounds { cell, .. } => *cell,
        }
    }
}

/// One operand of a formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Number(f64),
    Ref(CellRef),
}

/// An operand with its optional unary minus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Term {
    pub negated: bool,
    pub operand: Operand,
}

/// A validated formula: `terms` interleave with `operators`, so there is
/// always exactly one more term than operators.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedFormula {
    pub terms: Vec<Term>,
    pub operators: Vec<Operator>,
    /// Distinct referenced cells in order of first appearance.
    pub references: Vec<CellRef>,
}

impl ParsedFormula {
    /// Build the evaluator's infix stream, replacing each reference with the
    /// value `resolve` returns for it. Only whole operands are replaced, so
    /// `B1` never matches inside `B10`. Returns `None` if any reference is
    /// unresolved.
    pub fn substitute<F>(&self, mut resolve: F) -> Option<Vec<Element>>
    where
        F: FnMut(&CellRef) -> Option<f64>,
    {
        let mut infix = Vec::with_capacity(self.terms.len() + self.operators.len());
        for (idx, term) in self.terms.iter().enumerate() {
            let value = match term.operand {
                Operand::Number(n) => n,
                Operand::Ref(ref cell_ref) => resolve(cell_ref)?,
            };
            infix.push(Element::Number(if term.negated { -value } else { value }));
            if let Some(op) = self.operators.get(idx) {
                infix.push(Element::Operator(*op));
            }
        }
        Some(infix)
    }
}

/// Raw operand text before classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawTerm<'a> {
    pub negated: bool,
    pub token: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SplitError {
    Empty,
    DanglingOperator,
}

/// Split a formula body into operand tokens and the operators between them.
pub(crate) fn split_terms(body: &str) -> Result<(Vec<RawTerm<'_>>, Vec<Operator>), SplitError> {
    if body
        .chars()
        .all(|c| c.is_whitespace() || Operator::is_operator_char(c))
    {
        return Err(SplitError::Empty);
    }

    let mut terms = Vec::new();
    let mut operators = Vec::new();
    let mut rest = body.trim();

    loop {
        let mut negated = false;
        if let Some(stripped) = rest.strip_prefix('-') {
            negated = true;
            rest = stripped.trim_start();
            if rest.is_empty() {
                return Err(SplitError::DanglingOperator);
            }
        }

        match rest.char_indices().find(|(_, c)| Operator::is_operator_char(*c)) {
            Some((idx, c)) => {
                let token = rest[..idx].trim();
                rest = rest[idx + c.len_utf8()..].trim();
                if rest.is_empty() {
                    return Err(SplitError::DanglingOperator);
                }
                terms.push(RawTerm { negated, token });
                if let Some(op) = Operator::from_char(c) {
                    operators.push(op);
                }
            }
            None => {
                terms.push(RawTerm {
                    negated,
                    token: rest.trim(),
                });
                break;
            }
        }
    }

    Ok((terms, operators))
}

/// Validate one formula cell. `text` is the raw cell text including its
/// marker; bounds come from the grid the formula lives in.
pub fn parse_formula(
    cell: CellRef,
    text: &str,
    marker: char,
    rows: usize,
    cols: usize,
) -> Result<ParsedFormula, SyntaxError> {
    let body = text.trim().strip_prefix(marker).unwrap_or(text).trim();

    let (raw_terms, operators) = split_terms(body).map_err(|e| match e {
        SplitError::Empty => SyntaxError::EmptyExpression { cell },
        SplitError::DanglingOperator => SyntaxError::DanglingOperator {
            cell,
            text: text.to_string(),
        },
    })?;

    let mut terms = Vec::with_capacity(raw_terms.len());
    let mut references: Vec<CellRef> = Vec::new();

    for raw in raw_terms {
        let operand = if is_number(raw.token) {
            let n = raw.token.parse::<f64>().map_err(|_| SyntaxError::InvalidToken {
                cell,
                text: text.to_string(),
                token: raw.token.to_string(),
            })?;
            Operand::Number(n)
        } else {
            match classify_ref(raw.token, rows, cols) {
                RefClass::Ref(cell_ref) => {
                    if !references.contains(&cell_ref) {
                        references.push(cell_ref);
                    }
                    Operand::Ref(cell_ref)
                }
                RefClass::NotARef => {
                    return Err(SyntaxError::InvalidToken {
                        cell,
                        text: text.to_string(),
                        token: raw.token.to_string(),
                    });
                }
                RefClass::ColumnOutOfBounds => {
                    return Err(SyntaxError::ColumnOutOfBounds {
                        cell,
                        token: raw.token.to_string(),
                        column: raw.token.chars().next().unwrap_or('?'),
                    });
                }
                RefClass::RowOutOfBounds => {
                    return Err(SyntaxError::RowOutOfBounds {
                        cell,
                        token: raw.token.to_string(),
                        row: raw.token.chars().skip(1).collect(),
                    });
                }
            }
        };
        terms.push(Term {
            negated: raw.negated,
            operand,
        });
    }

    Ok(ParsedFormula {
        terms,
        operators,
        references,
    })
}

/// Result of validating every formula in a grid.
#[derive(Debug, Default)]
pub struct SyntaxAnalysis {
    /// Valid formulas in row-major order.
    pub formulas: Vec<(CellRef, ParsedFormula)>,
    pub errors: Vec<SyntaxError>,
}

/// Validate every formula cell and record its [`Validity`] in the grid.
pub fn analyze_grid(grid: &mut Grid, marker: char) -> SyntaxAnalysis {
    let rows = grid.rows();
    let cols = grid.cols();
    let mut analysis = SyntaxAnalysis::default();

    let targets: Vec<(CellRef, String)> = grid
        .iter()
        .filter_map(|(cell_ref, cell)| match &cell.contents {
            CellType::Expression { text, .. } => Some((cell_ref, text.clone())),
            _ => None,
        })
        .collect();

    for (cell_ref, text) in targets {
        let outcome = parse_formula(cell_ref, &text, marker, rows, cols);
        let tag = if outcome.is_ok() {
            Validity::Valid
        } else {
            Validity::Invalid
        };

        if let Some(cell) = grid.get_mut(&cell_ref) {
            if let CellType::Expression { validity, .. } = &mut cell.contents {
                *validity = tag;
            }
        }

        match outcome {
            Ok(parsed) => analysis.formulas.push((cell_ref, parsed)),
            Err(err) => {
                log::warn!("{}", err);
                analysis.errors.push(err);
            }
        }
    }

    analysis
}
