//! Invalid-dependency detection.
//!
//! After the graph is known to be acyclic, every cell a formula reaches must
//! hold a number or a valid formula. Text, colour, empty cells, and formulas
//! that failed syntax analysis cannot feed arithmetic, so the first such cell
//! found aborts the solve.

use std::collections::HashSet;
use std::fmt;

use super::cell::{CellType, Grid, Validity};
use super::cell_ref::CellRef;
use super::graph::{DependencyGraph, NodeId};

/// What made a reached cell unusable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Offending {
    Empty,
    Text(String),
    Colour(String),
    InvalidExpression(String),
}

impl Offending {
    fn describe(&self) -> &'static str {
        match self {
            Offending::Empty => "an empty cell",
            Offending::Text(_) => "a text cell",
            Offending::Colour(_) => "a colour cell",
            Offending::InvalidExpression(_) => "an invalid expression cell",
        }
    }

    fn content(&self) -> &str {
        match self {
            Offending::Empty => "",
            Offending::Text(s) | Offending::Colour(s) | Offending::InvalidExpression(s) => s,
        }
    }
}

/// A formula chain ending in an unusable cell. `path` runs from the
/// top-level formula to the offending cell inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidDependency {
    pub path: Vec<CellRef>,
    pub offending: Offending,
}

impl InvalidDependency {
    pub fn target(&self) -> Option<CellRef> {
        self.path.last().copied()
    }
}

impl fmt::Display for InvalidDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[DEPCHK] Expressions depend on {}: ",
            self.offending.describe()
        )?;
        let Some((target, chain)) = self.path.split_last() else {
            return Ok(());
        };
        for cell_ref in chain {
            write!(f, "{} -> ", cell_ref)?;
        }
        write!(f, "( {} = '{}')", target, self.offending.content())
    }
}

fn offending(grid: &Grid, cell_ref: &CellRef) -> Option<Offending> {
    let Some(cell) = grid.get(cell_ref) else {
        return Some(Offending::Empty);
    };
    match &cell.contents {
        CellType::Number(_) => None,
        CellType::Expression {
            validity: Validity::Valid,
            ..
        } => None,
        CellType::Expression { text, .. } => Some(Offending::InvalidExpression(text.clone())),
        CellType::Text(s) => Some(Offending::Text(s.clone())),
        CellType::Colour(s) => Some(Offending::Colour(s.clone())),
        CellType::Empty => Some(Offending::Empty),
    }
}

/// Walk every chain reachable from the root and report the first one that
/// ends in an unusable cell.
pub fn find_invalid_dependency(grid: &Grid, graph: &DependencyGraph) -> Option<InvalidDependency> {
    let mut visited: HashSet<NodeId> = HashSet::new();

    for &start in graph.top_level() {
        if visited.contains(&start) {
            continue;
        }
        if let Some(found) = check_dfs(grid, graph, start, &mut visited) {
            log::debug!("invalid dependency at {:?}", found.target());
            return Some(found);
        }
    }

    None
}

fn check_dfs(
    grid: &Grid,
    graph: &DependencyGraph,
    start: NodeId,
    visited: &mut HashSet<NodeId>,
) -> Option<InvalidDependency> {
    // (node, index of the next edge to follow)
    let mut stack: Vec<(NodeId, usize)> = Vec::new();

    if let Some(found) = enter(grid, graph, start, &mut stack, visited) {
        return Some(found);
    }

    while let Some(frame) = stack.last_mut() {
        let deps = graph.dependencies(frame.0);
        if frame.1 == deps.len() {
            stack.pop();
            continue;
        }
        let target = deps[frame.1];
        frame.1 += 1;

        if visited.contains(&target) {
            continue;
        }
        if let Some(found) = enter(grid, graph, target, &mut stack, visited) {
            return Some(found);
        }
    }

    None
}

/// Push `id` onto the path and classify its cell.
fn enter(
    grid: &Grid,
    graph: &DependencyGraph,
    id: NodeId,
    stack: &mut Vec<(NodeId, usize)>,
    visited: &mut HashSet<NodeId>,
) -> Option<InvalidDependency> {
    visited.insert(id);
    stack.push((id, 0));
    let cell_ref = graph.cell(id)?;
    let offending = offending(grid, &cell_ref)?;
    let path = stack.iter().filter_map(|(id, _)| graph.cell(*id)).collect();
    Some(InvalidDependency { path, offending })
}
