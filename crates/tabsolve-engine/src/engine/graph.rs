//! Dependency graph between formula cells.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Slot 0 is the
//! synthetic root, which owns one edge per top-level formula cell. Every other
//! node stands for exactly one grid coordinate: a coordinate→id index makes
//! find-or-create O(1) and guarantees two formulas referencing the same cell
//! share a single node.

use std::collections::HashMap;

use super::cell_ref::CellRef;

/// Stable handle to a node in a [`DependencyGraph`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeId(usize);

/// A graph vertex: its coordinate (none for the root) and outgoing edges in
/// insertion order.
#[derive(Clone, Debug)]
pub struct Node {
    pub cell: Option<CellRef>,
    pub dependencies: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<CellRef, NodeId>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl DependencyGraph {
    /// Create a graph holding only the root. `expression_count` sizes the
    /// arena and the root's edge list.
    pub fn with_capacity(expression_count: usize) -> Self {
        let mut nodes = Vec::with_capacity(expression_count + 1);
        nodes.push(Node {
            cell: None,
            dependencies: Vec::with_capacity(expression_count),
        });
        DependencyGraph {
            nodes,
            index: HashMap::with_capacity(expression_count),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Top-level formula cells, in the order they were attached.
    pub fn top_level(&self) -> &[NodeId] {
        &self.nodes[0].dependencies
    }

    /// Number of cell nodes (the root is not counted).
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.top_level().is_empty()
    }

    pub fn dependencies(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].dependencies
    }

    /// Coordinate of a node. The root has none.
    pub fn cell(&self, id: NodeId) -> Option<CellRef> {
        self.nodes[id.0].cell
    }

    pub fn find(&self, cell_ref: &CellRef) -> Option<NodeId> {
        self.index.get(cell_ref).copied()
    }

    fn find_or_create(&mut self, cell_ref: CellRef) -> (NodeId, bool) {
        if let Some(id) = self.index.get(&cell_ref) {
            return (*id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            cell: Some(cell_ref),
            dependencies: Vec::new(),
        });
        self.index.insert(cell_ref, id);
        (id, true)
    }

    /// Record that the formula in `owner` references `references`.
    ///
    /// An owner seen for the first time is attached under the root; an owner
    /// that already exists (because an earlier formula referenced it) stays
    /// reachable through that formula instead. Self-references are kept and
    /// surface later as a one-node cycle.
    pub fn add_formula(&mut self, owner: CellRef, references: &[CellRef]) -> NodeId {
        let (owner_id, created) = self.find_or_create(owner);
        if created {
            self.nodes[0].dependencies.push(owner_id);
            log::debug!("graph: {} attached under root", owner);
        }

        for reference in references {
            let (dep_id, _) = self.find_or_create(*reference);
            self.nodes[owner_id.0].dependencies.push(dep_id);
            log::debug!("graph: {} -> {}", owner, reference);
        }

        owner_id
    }

    /// Render a path of nodes as `A0 -> B1 -> C2`.
    pub fn render_path(&self, path: &[NodeId]) -> String {
        path.iter()
            .filter_map(|id| self.cell(*id))
            .map(|cell_ref| cell_ref.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
