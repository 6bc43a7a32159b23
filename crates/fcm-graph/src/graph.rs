//! Core graph data structures.

use fcm_core::{EdgeId, NodeId, Real};

use crate::error::{GraphError, GraphResult};
use crate::indexing::KeyIndex;

/// A concept in the cognitive map.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Caller-facing identifier (unique within the graph).
    pub key: String,
    /// Display text. Not used by the math.
    pub label: String,
    /// Stored activation, the lowest-precedence initial value.
    pub value: Option<Real>,
    /// Exogenous node: frozen for the whole run.
    pub driver: bool,
}

/// Signed causal influence `source -> target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub weight: Real,
}

/// The graph: a validated, immutable snapshot of nodes and edges for one run.
///
/// Besides the flat node/edge vectors it keeps a compact incoming adjacency:
/// node i's inbound edges are `incoming[incoming_offsets[i]..incoming_offsets[i+1]]`,
/// ordered by edge id so weighted sums are evaluated in a fixed order.
#[derive(Debug, Clone)]
pub struct ModelGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) incoming_offsets: Vec<usize>,
    pub(crate) incoming: Vec<EdgeId>,
    pub(crate) index: KeyIndex,
}

impl ModelGraph {
    /// Return all nodes, in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all edges, in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    /// Get an edge by ID (returns None if ID out of bounds).
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.slot())
    }

    /// Key lookup.
    pub fn index(&self) -> &KeyIndex {
        &self.index
    }

    /// Resolve a caller key to its node, failing on unknown keys.
    pub fn node_by_key(&self, key: &str) -> GraphResult<&Node> {
        self.index
            .get(key)
            .and_then(|id| self.node(id))
            .ok_or_else(|| GraphError::UnknownNode {
                key: key.to_string(),
            })
    }

    /// Edge ids whose target is `node_id`.
    pub fn incoming_ids(&self, node_id: NodeId) -> &[EdgeId] {
        let idx = node_id.slot();
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.incoming_offsets[idx];
        let end = self.incoming_offsets[idx + 1];
        &self.incoming[start..end]
    }

    /// Iterate over the edges feeding `node_id`.
    pub fn incoming(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming_ids(node_id)
            .iter()
            .map(move |e| &self.edges[e.slot()])
    }

    /// Iterate over driver nodes.
    pub fn drivers(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|n| n.driver)
    }
}

#[cfg(test)]
mod tests {
    use crate::GraphBuilder;

    #[test]
    fn incoming_of_out_of_range_node_is_empty() {
        let mut b = GraphBuilder::new();
        b.add_node("a", "A", Some(0.0));
        let g = b.build().unwrap();
        assert!(g.incoming_ids(fcm_core::Id::from_index(7)).is_empty());
    }

    #[test]
    fn node_by_key_unknown() {
        let mut b = GraphBuilder::new();
        b.add_node("a", "A", Some(0.0));
        let g = b.build().unwrap();
        assert_eq!(g.node_by_key("a").unwrap().label, "A");
        assert!(g.node_by_key("zzz").is_err());
    }

    #[test]
    fn drivers_filter() {
        let mut b = GraphBuilder::new();
        let a = b.add_node("a", "A", Some(1.0));
        b.add_node("b", "B", Some(0.0));
        b.set_driver(a, true);
        let g = b.build().unwrap();
        let keys: Vec<_> = g.drivers().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["a"]);
    }
}
