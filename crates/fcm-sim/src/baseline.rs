//! Baseline comparison.
//!
//! The baseline is a second propagation over the same graph and parameters
//! from a separately resolved starting point. How that starting point is
//! chosen is up to the caller; this module only runs it and diffs the
//! settled states.

use fcm_core::{NodeId, Real};
use fcm_graph::ModelGraph;

use crate::engine::RunOutcome;

/// Per-node `primary - baseline` of the final states.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DeltaState {
    entries: Vec<(NodeId, Real)>,
}

impl DeltaState {
    pub fn get(&self, id: NodeId) -> Option<Real> {
        self.entries
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, d)| *d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Real)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Baseline run plus its deltas against the primary run.
#[derive(Clone, Debug, PartialEq)]
pub struct BaselineComparison {
    pub outcome: RunOutcome,
    pub delta: DeltaState,
}

/// Diff two final states node by node. A node missing from either side is
/// left out of the result.
pub fn delta_state(graph: &ModelGraph, primary: &RunOutcome, baseline: &RunOutcome) -> DeltaState {
    let entries = graph
        .nodes()
        .iter()
        .filter_map(|node| {
            let p = primary.final_state.get(node.id)?;
            let b = baseline.final_state.get(node.id)?;
            Some((node.id, p - b))
        })
        .collect();
    DeltaState { entries }
}
