//! Incremental graph builder.

use fcm_core::{EdgeId, NodeId, Real};

use crate::error::GraphResult;
use crate::graph::{Edge, ModelGraph, Node};
use crate::indexing::KeyIndex;
use crate::validate;

/// Edge as declared by the caller, endpoints still named by key.
#[derive(Debug, Clone)]
pub(crate) struct PendingEdge {
    pub(crate) id: EdgeId,
    pub(crate) source: String,
    pub(crate) target: String,
    pub(crate) weight: Real,
}

/// Builder for constructing a graph incrementally.
///
/// Use `add_node` and `add_edge` to build up the graph,
/// then call `build()` to validate and freeze it into an immutable `ModelGraph`.
/// Edges name their endpoints by key, so they may be added before the nodes
/// they reference; dangling keys are reported by `build()`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<PendingEdge>,
    next_node_id: u32,
    next_edge_id: u32,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph and return its ID.
    pub fn add_node(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        value: Option<Real>,
    ) -> NodeId {
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(Node {
            id,
            key: key.into(),
            label: label.into(),
            value,
            driver: false,
        });
        id
    }

    /// Mark or unmark a node as an exogenous driver.
    pub fn set_driver(&mut self, node_id: NodeId, driver: bool) {
        if let Some(node) = self.nodes.get_mut(node_id.slot()) {
            node.driver = driver;
        }
    }

    /// Add a weighted edge between two node keys and return its ID.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        weight: Real,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.push(PendingEdge {
            id,
            source: source.into(),
            target: target.into(),
            weight,
        });
        id
    }

    /// Build and validate the graph, returning an immutable `ModelGraph`.
    pub fn build(self) -> GraphResult<ModelGraph> {
        validate::validate_nodes(&self.nodes)?;
        let index = KeyIndex::from_nodes(&self.nodes);
        let edges = validate::resolve_edges(&index, &self.edges)?;

        let (incoming_offsets, incoming) = Self::build_incoming(&self.nodes, &edges);

        Ok(ModelGraph {
            nodes: self.nodes,
            edges,
            incoming_offsets,
            incoming,
            index,
        })
    }

    /// Bucket edges by target node into a flat offsets/ids pair.
    fn build_incoming(nodes: &[Node], edges: &[Edge]) -> (Vec<usize>, Vec<EdgeId>) {
        let mut counts = vec![0usize; nodes.len()];
        for edge in edges {
            counts[edge.target.slot()] += 1;
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        offsets.push(0);
        for c in &counts {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + c);
        }

        // Edges are visited in id order, so each bucket stays sorted by id
        let mut cursor = offsets[..nodes.len()].to_vec();
        let mut flat = vec![EdgeId::from_index(0); edges.len()];
        for edge in edges {
            let slot = &mut cursor[edge.target.slot()];
            flat[*slot] = edge.id;
            *slot += 1;
        }

        (offsets, flat)
    }
}
