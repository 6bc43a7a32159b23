//! Frozen-node mask.
//!
//! Drivers and per-run clamped ids are folded into one mask before the
//! iteration loop so the update step only does an index lookup.

use fcm_core::NodeId;
use fcm_graph::ModelGraph;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClampSet {
    mask: Vec<bool>,
    count: usize,
}

impl ClampSet {
    /// Graph drivers plus every key in `extra`. Keys that are not in the
    /// graph are skipped.
    pub fn new<'k>(graph: &ModelGraph, extra: impl IntoIterator<Item = &'k str>) -> Self {
        let mut mask: Vec<bool> = graph.nodes().iter().map(|n| n.driver).collect();
        for key in extra {
            match graph.index().get(key) {
                Some(id) => mask[id.slot()] = true,
                None => warn!(key = %key, "ignoring clamp on unknown node"),
            }
        }
        let count = mask.iter().filter(|&&c| c).count();
        Self { mask, count }
    }

    /// Only the graph's drivers.
    pub fn drivers_only(graph: &ModelGraph) -> Self {
        Self::new(graph, std::iter::empty())
    }

    #[inline]
    pub fn is_clamped(&self, id: NodeId) -> bool {
        self.mask.get(id.slot()).copied().unwrap_or(false)
    }

    #[inline]
    pub(crate) fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Number of frozen nodes.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of node slots the mask covers.
    pub fn width(&self) -> usize {
        self.mask.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| NodeId::from_index(i as u32))
    }
}
