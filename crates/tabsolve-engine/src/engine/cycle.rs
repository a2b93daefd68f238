//! Circular dependency detection for formula cells.
//!
//! A formula that (transitively) references itself can never be evaluated
//! (e.g., A0 references B0, B0 references C0, C0 references A0). This module
//! runs a depth-first search over the whole dependency graph before any value
//! is computed and reports the first cycle it meets.

use std::collections::HashSet;
use std::fmt;

use super::CellRef;
use super::graph::{DependencyGraph, NodeId};

/// A dependency cycle, closed: the first coordinate is repeated at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cycle {
    pub path: Vec<CellRef>,
}

impl Cycle {
    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        self.path.contains(cell_ref)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.path.iter().map(|c| c.to_string()).collect();
        write!(
            f,
            "[CYCLE CHECK] A dependency cycle was found: {}",
            rendered.join(" -> ")
        )
    }
}

/// Search every top-level formula for a cycle.
/// Returns the first cycle found, or None if the graph is acyclic.
pub fn detect_cycle(graph: &DependencyGraph) -> Option<Cycle> {
    let mut visited: HashSet<NodeId> = HashSet::new();

    for &start in graph.top_level() {
        if visited.contains(&start) {
            continue;
        }
        if let Some(path) = detect_cycle_dfs(graph, start, &mut visited) {
            let path: Vec<CellRef> = path.iter().filter_map(|id| graph.cell(*id)).collect();
            log::debug!("cycle found through {} cells", path.len().saturating_sub(1));
            return Some(Cycle { path });
        }
    }

    None
}

/// Iterative DFS from `start`. `visited` persists across starts; the
/// recursion stack does not.
fn detect_cycle_dfs(
    graph: &DependencyGraph,
    start: NodeId,
    visited: &mut HashSet<NodeId>,
) -> Option<Vec<NodeId>> {
    let mut on_path: HashSet<NodeId> = HashSet::new();
    // (node, index of the next edge to follow)
    let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
    visited.insert(start);
    on_path.insert(start);

    while let Some(frame) = stack.last_mut() {
        let node = frame.0;
        let deps = graph.dependencies(node);

        if frame.1 == deps.len() {
            on_path.remove(&node);
            stack.pop();
            continue;
        }

        let target = deps[frame.1];
        frame.1 += 1;

        if on_path.contains(&target) {
            let from = stack.iter().position(|(id, _)| *id == target)?;
            let mut path: Vec<NodeId> = stack[from..].iter().map(|(id, _)| *id).collect();
            path.push(target);
            return Some(path);
        }

        if visited.insert(target) {
            on_path.insert(target);
            stack.push((target, 0));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn names(cycle: &Cycle) -> Vec<String> {
        cycle.path.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_detect_cycle_no_cycle() {
        let mut graph = DependencyGraph::default();
        graph.add_formula(r("C0"), &[r("A0"), r("B0")]);
        graph.add_formula(r("D0"), &[r("C0"), r("A0")]);

        assert!(detect_cycle(&graph).is_none());
    }

    #[test]
    fn test_detect_cycle_direct() {
        let mut graph = DependencyGraph::default();
        graph.add_formula(r("A0"), &[r("B0")]);
        graph.add_formula(r("B0"), &[r("A0")]);

        let cycle = detect_cycle(&graph).unwrap();
        assert_eq!(names(&cycle), vec!["A0", "B0", "A0"]);
        assert_eq!(
            cycle.to_string(),
            "[CYCLE CHECK] A dependency cycle was found: A0 -> B0 -> A0"
        );
    }

    #[test]
    fn test_detect_cycle_indirect_reports_suffix_only() {
        let mut graph = DependencyGraph::default();
        graph.add_formula(r("D0"), &[r("A0")]);
        graph.add_formula(r("A0"), &[r("B0")]);
        graph.add_formula(r("B0"), &[r("C0")]);
        graph.add_formula(r("C0"), &[r("A0")]);

        let cycle = detect_cycle(&graph).unwrap();
        assert_eq!(names(&cycle), vec!["A0", "B0", "C0", "A0"]);
        assert!(!cycle.contains(&r("D0")));
    }

    #[test]
    fn test_detect_cycle_self_reference() {
        let mut graph = DependencyGraph::default();
        graph.add_formula(r("A0"), &[r("A0")]);

        let cycle = detect_cycle(&graph).unwrap();
        assert_eq!(names(&cycle), vec!["A0", "A0"]);
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut graph = DependencyGraph::default();
        graph.add_formula(r("A0"), &[r("B0"), r("C0")]);
        graph.add_formula(r("B0"), &[r("D0")]);
        graph.add_formula(r("C0"), &[r("D0")]);

        assert!(detect_cycle(&graph).is_none());
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let mut graph = DependencyGraph::default();
        for row in 0..998 {
            graph.add_formula(CellRef::new(row, 0), &[CellRef::new(row + 1, 0)]);
        }
        assert!(detect_cycle(&graph).is_none());

        graph.add_formula(CellRef::new(998, 0), &[CellRef::new(0, 0)]);
        let cycle = detect_cycle(&graph).unwrap();
        assert_eq!(cycle.path.len(), 1000);
    }
}
