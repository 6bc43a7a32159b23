//! Dense activation vectors.

use fcm_core::{NodeId, Real};
use fcm_graph::ModelGraph;

/// One value per node, indexed by node slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State(Vec<Real>);

impl State {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<Real> {
        self.0.get(id.slot()).copied()
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.0
    }

    /// Pair each value with its node key.
    pub fn keyed<'g>(&'g self, graph: &'g ModelGraph) -> impl Iterator<Item = (&'g str, Real)> + 'g {
        graph
            .nodes()
            .iter()
            .zip(self.0.iter())
            .map(|(n, &v)| (n.key.as_str(), v))
    }
}

impl From<Vec<Real>> for State {
    fn from(values: Vec<Real>) -> Self {
        State(values)
    }
}

impl From<State> for Vec<Real> {
    fn from(state: State) -> Self {
        state.0
    }
}
