//! Table calculation engine API.
//!
//! This module provides the core computation engine for a formula table:
//!
//! - [`Cell`], [`CellType`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Cell reference parsing (`A0` notation ↔ row/col indices)
//! - [`is_number`], [`classify_ref`] - Token classification
//! - [`parse_formula`], [`analyze_grid`] - Formula syntax validation
//! - [`DependencyGraph`] - Shared reference graph between formula cells
//! - [`detect_cycle`] - Circular dependency detection
//! - [`find_invalid_dependency`] - Formulas depending on unusable cells
//! - [`evaluate`], [`evaluate_str`] - Shunting-yard arithmetic
//! - [`solve`] - The whole pipeline over one grid
//! - [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod classify;
mod cycle;
mod eval;
mod format;
mod graph;
mod solve;
mod syntax;
mod validity;

pub use cell::{Cell, CellType, DEFAULT_MARKER, Grid, GridError, Validity};
pub use cell_ref::{CellRef, MAX_COLS, MAX_ROWS};
pub use classify::{RefClass, classify_ref, is_number};
pub use cycle::{Cycle, detect_cycle};
pub use eval::{Element, EvalError, Operator, evaluate, evaluate_postfix, evaluate_str, to_postfix};
pub use format::format_number;
pub use graph::{DependencyGraph, Node, NodeId};
pub use solve::{
    Diagnostic, SolveReport, SolveStatus, build_graph, solve, solve_with_count, solve_with_marker,
};
pub use syntax::{Operand, ParsedFormula, SyntaxAnalysis, SyntaxError, Term, analyze_grid, parse_formula};
pub use validity::{InvalidDependency, Offending, find_invalid_dependency};
