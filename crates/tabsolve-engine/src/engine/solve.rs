//! Whole-grid solve pipeline.
//!
//! A solve runs four passes over one grid, each gated on the previous one:
//!
//! 1. syntax analysis of every formula ([`analyze_grid`]),
//! 2. cycle detection ([`detect_cycle`]),
//! 3. invalid-dependency detection ([`find_invalid_dependency`]),
//! 4. post-order evaluation, memoized per node.
//!
//! Syntax errors only disable the offending cell. A cycle or an invalid
//! dependency aborts the pass before any cell is written.

use std::collections::HashMap;
use std::fmt;

use super::cell::{CellType, DEFAULT_MARKER, Grid};
use super::cell_ref::CellRef;
use super::cycle::{Cycle, detect_cycle};
use super::eval::{EvalError, evaluate};
use super::graph::{DependencyGraph, NodeId};
use super::syntax::{ParsedFormula, SyntaxError, analyze_grid};
use super::validity::{InvalidDependency, find_invalid_dependency};

/// Overall outcome of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// Every valid formula was evaluated and written back.
    Solved,
    /// No valid formulas were found.
    NothingToSolve,
    AbortedCycle,
    AbortedInvalidDependency,
    /// A validated formula failed to reduce. Not reachable for formulas
    /// produced by syntax analysis.
    AbortedEvaluation,
}

impl SolveStatus {
    pub fn is_aborted(self) -> bool {
        matches!(
            self,
            SolveStatus::AbortedCycle
                | SolveStatus::AbortedInvalidDependency
                | SolveStatus::AbortedEvaluation
        )
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SolveStatus::Solved => "[SOLVE] No errors found. Solved.",
            SolveStatus::NothingToSolve => "[SOLVE] There is nothing to solve.",
            SolveStatus::AbortedCycle
            | SolveStatus::AbortedInvalidDependency
            | SolveStatus::AbortedEvaluation => "[SOLVE] Terminated abnormally.",
        };
        f.write_str(text)
    }
}

/// One problem found during a solve.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    Syntax(SyntaxError),
    Cycle(Cycle),
    InvalidDependency(InvalidDependency),
    Evaluation { cell: CellRef, error: EvalError },
}

impl Diagnostic {
    /// Cells the diagnostic points at, for highlighting.
    pub fn cells(&self) -> Vec<CellRef> {
        match self {
            Diagnostic::Syntax(err) => vec![err.cell()],
            Diagnostic::Cycle(cycle) => cycle.path.clone(),
            Diagnostic::InvalidDependency(found) => found.path.clone(),
            Diagnostic::Evaluation { cell, .. } => vec![*cell],
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Syntax(err) => write!(f, "{}", err),
            Diagnostic::Cycle(cycle) => write!(f, "{}", cycle),
            Diagnostic::InvalidDependency(found) => write!(f, "{}", found),
            Diagnostic::Evaluation { cell, error } => {
                write!(f, "[EVAL ERROR] Cell {}: {}", cell, error)
            }
        }
    }
}

/// Result of [`solve`]: status, diagnostics in discovery order, and the
/// number of formulas evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveReport {
    pub status: SolveStatus,
    pub diagnostics: Vec<Diagnostic>,
    pub evaluated: usize,
}

impl SolveReport {
    fn new(status: SolveStatus, diagnostics: Vec<Diagnostic>) -> Self {
        SolveReport {
            status,
            diagnostics,
            evaluated: 0,
        }
    }
}

/// Solve every `=`-formula in the grid in place.
pub fn solve(grid: &mut Grid) -> SolveReport {
    solve_with_marker(grid, DEFAULT_MARKER)
}

/// Solve every formula introduced by `marker` in the grid in place.
pub fn solve_with_marker(grid: &mut Grid, marker: char) -> SolveReport {
    let expression_count = grid.expression_count();
    solve_with_count(grid, marker, expression_count)
}

/// Like [`solve_with_marker`], reusing the formula count tallied while the
/// grid was populated. The count sizes graph storage.
pub fn solve_with_count(grid: &mut Grid, marker: char, expression_count: usize) -> SolveReport {
    let analysis = analyze_grid(grid, marker);
    let mut diagnostics: Vec<Diagnostic> =
        analysis.errors.into_iter().map(Diagnostic::Syntax).collect();

    let graph = build_graph(expression_count, &analysis.formulas);
    log::debug!(
        "solve: {} formulas, {} valid, {} graph nodes",
        expression_count,
        analysis.formulas.len(),
        graph.len()
    );

    if graph.is_empty() {
        log::info!("{}", SolveStatus::NothingToSolve);
        return SolveReport::new(SolveStatus::NothingToSolve, diagnostics);
    }

    if let Some(cycle) = detect_cycle(&graph) {
        log::warn!("{}", cycle);
        diagnostics.push(Diagnostic::Cycle(cycle));
        return SolveReport::new(SolveStatus::AbortedCycle, diagnostics);
    }

    if let Some(found) = find_invalid_dependency(grid, &graph) {
        log::warn!("{}", found);
        diagnostics.push(Diagnostic::InvalidDependency(found));
        return SolveReport::new(SolveStatus::AbortedInvalidDependency, diagnostics);
    }

    let formulas: HashMap<CellRef, &ParsedFormula> =
        analysis.formulas.iter().map(|(r, f)| (*r, f)).collect();

    let solved = match evaluate_graph(grid, &graph, &formulas) {
        Ok(solved) => solved,
        Err(diagnostic) => {
            log::warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
            return SolveReport::new(SolveStatus::AbortedEvaluation, diagnostics);
        }
    };

    for (cell_ref, value) in &solved {
        if let Some(cell) = grid.get_mut(cell_ref) {
            cell.contents = CellType::Number(*value);
        }
    }

    log::info!("{} ({} formulas evaluated)", SolveStatus::Solved, solved.len());
    SolveReport {
        status: SolveStatus::Solved,
        diagnostics,
        evaluated: solved.len(),
    }
}

/// Merge every valid formula's references into one graph.
pub fn build_graph(
    expression_count: usize,
    formulas: &[(CellRef, ParsedFormula)],
) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(expression_count);
    for (cell_ref, parsed) in formulas {
        graph.add_formula(*cell_ref, &parsed.references);
    }
    graph
}

/// Post-order walk computing every formula reachable from the root. Values
/// are collected and only written back once the whole walk succeeds.
fn evaluate_graph(
    grid: &Grid,
    graph: &DependencyGraph,
    formulas: &HashMap<CellRef, &ParsedFormula>,
) -> Result<Vec<(CellRef, f64)>, Diagnostic> {
    let mut values: HashMap<NodeId, f64> = HashMap::with_capacity(graph.len());
    let mut solved: Vec<(CellRef, f64)> = Vec::new();

    for &start in graph.top_level() {
        if values.contains_key(&start) {
            continue;
        }

        // (node, index of the next edge to follow)
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let deps = graph.dependencies(frame.0);
            if frame.1 < deps.len() {
                let target = deps[frame.1];
                frame.1 += 1;
                if !values.contains_key(&target) {
                    stack.push((target, 0));
                }
                continue;
            }

            let node = frame.0;
            stack.pop();
            if values.contains_key(&node) {
                continue;
            }
            let Some(cell_ref) = graph.cell(node) else {
                continue;
            };

            let value = match grid.get(&cell_ref).map(|c| &c.contents) {
                Some(CellType::Number(n)) => *n,
                _ => {
                    let value = evaluate_formula(cell_ref, graph, formulas, &values)?;
                    log::debug!("solve: {} = {}", cell_ref, value);
                    solved.push((cell_ref, value));
                    value
                }
            };
            values.insert(node, value);
        }
    }

    Ok(solved)
}

fn evaluate_formula(
    cell_ref: CellRef,
    graph: &DependencyGraph,
    formulas: &HashMap<CellRef, &ParsedFormula>,
    values: &HashMap<NodeId, f64>,
) -> Result<f64, Diagnostic> {
    let unresolved = |name: String| Diagnostic::Evaluation {
        cell: cell_ref,
        error: EvalError::Unresolved(name),
    };

    let Some(parsed) = formulas.get(&cell_ref) else {
        return Err(unresolved(cell_ref.to_string()));
    };

    let mut missing = None;
    let infix = parsed
        .substitute(|r| {
            let value = graph.find(r).and_then(|id| values.get(&id).copied());
            if value.is_none() {
                missing = Some(*r);
            }
            value
        })
        .ok_or_else(|| unresolved(missing.map(|r| r.to_string()).unwrap_or_default()))?;

    evaluate(&infix).map_err(|error| Diagnostic::Evaluation {
        cell: cell_ref,
        error,
    })
}
