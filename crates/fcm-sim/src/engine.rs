//! Propagation engine: synchronous discrete-time update to a fixed point.
//!
//! ```text
//! state[0] = initial
//! for t in 1..=max_iterations:
//!     state[t][n] = state[t-1][n]                         if n is clamped
//!     state[t][n] = f( Σ w(m,n) * state[t-1][m] )          otherwise
//!     stop when max |state[t][n] - state[t-1][n]| <= threshold   (non-clamped n)
//! ```
//!
//! Every node at step `t` reads only step `t-1`, so the result does not
//! depend on node order. Non-finite values are carried as-is.

use fcm_core::{Activation, NodeId, Real, ensure_finite, max_nan_sticky};
use fcm_graph::ModelGraph;
use tracing::debug;

use crate::clamp::ClampSet;
use crate::error::{SimError, SimResult};
use crate::state::State;

/// Upper bound on series preallocation; long runs grow the vectors.
const SERIES_PREALLOC: usize = 1024;

/// Parameters shared by the primary and baseline runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropagationParams {
    pub activation: Activation,
    /// Convergence tolerance on the largest per-node change.
    pub threshold: Real,
    /// Hard cap on iterations. Zero returns the initial state unchanged.
    pub max_iterations: usize,
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self {
            activation: Activation::Sigmoid,
            threshold: 0.001,
            max_iterations: 100,
        }
    }
}

impl PropagationParams {
    pub fn validate(&self) -> SimResult<()> {
        let threshold = ensure_finite(self.threshold, "threshold")?;
        if threshold < 0.0 {
            return Err(SimError::invalid_parameters(format!(
                "threshold must be non-negative, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Starting point of one run.
#[derive(Clone, Debug)]
pub struct RunInput {
    pub initial: State,
    pub clamped: ClampSet,
}

impl RunInput {
    pub fn new(initial: State, clamped: ClampSet) -> Self {
        Self { initial, clamped }
    }

    /// Both vectors must cover exactly the graph's nodes.
    pub fn validate(&self, graph: &ModelGraph) -> SimResult<()> {
        let n = graph.node_count();
        if self.initial.len() != n {
            return Err(SimError::invalid_model(format!(
                "initial state has {} values for {} nodes",
                self.initial.len(),
                n
            )));
        }
        if self.clamped.width() != n {
            return Err(SimError::invalid_model(format!(
                "clamp set covers {} nodes, graph has {}",
                self.clamped.width(),
                n
            )));
        }
        Ok(())
    }
}

/// Result of one propagation run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    /// Per-node value history, `series[node][t]`, `t = 0` is the initial state.
    pub series: Vec<Vec<Real>>,
    pub final_state: State,
    pub iterations: usize,
    pub converged: bool,
}

impl RunOutcome {
    pub fn series_of(&self, id: NodeId) -> &[Real] {
        self.series.get(id.slot()).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Run the update rule until convergence or the iteration cap.
pub fn propagate(
    graph: &ModelGraph,
    input: &RunInput,
    params: &PropagationParams,
) -> SimResult<RunOutcome> {
    params.validate()?;
    input.validate(graph)?;

    let n = graph.node_count();
    let clamped = input.clamped.mask();

    // Inbound (source slot, weight) lists, flattened once per run
    let inbound: Vec<Vec<(usize, Real)>> = graph
        .nodes()
        .iter()
        .map(|node| {
            graph
                .incoming(node.id)
                .map(|e| (e.source.slot(), e.weight))
                .collect()
        })
        .collect();

    debug!(
        nodes = n,
        edges = graph.edges().len(),
        clamped = input.clamped.len(),
        activation = %params.activation,
        threshold = params.threshold,
        max_iterations = params.max_iterations,
        "propagation start"
    );

    let mut prev: Vec<Real> = input.initial.as_slice().to_vec();
    let mut next: Vec<Real> = vec![0.0; n];

    let capacity = params.max_iterations.min(SERIES_PREALLOC) + 1;
    let mut series: Vec<Vec<Real>> = prev
        .iter()
        .map(|&v| {
            let mut s = Vec::with_capacity(capacity);
            s.push(v);
            s
        })
        .collect();

    // Zero iterations: nothing moved, so the (empty) change set is within tolerance
    let mut converged = params.max_iterations == 0;
    let mut iterations = 0;

    for t in 1..=params.max_iterations {
        for i in 0..n {
            next[i] = if clamped[i] {
                prev[i]
            } else {
                let weighted: Real = inbound[i].iter().map(|&(src, w)| w * prev[src]).sum();
                params.activation.apply(weighted)
            };
        }

        let max_delta = (0..n)
            .filter(|&i| !clamped[i])
            .map(|i| (next[i] - prev[i]).abs())
            .fold(0.0, max_nan_sticky);

        for (s, &v) in series.iter_mut().zip(next.iter()) {
            s.push(v);
        }

        std::mem::swap(&mut prev, &mut next);
        iterations = t;

        if max_delta <= params.threshold {
            converged = true;
            break;
        }
    }

    debug!(iterations, converged, "propagation finished");

    Ok(RunOutcome {
        series,
        final_state: State::from(prev),
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcm_graph::GraphBuilder;

    fn chain() -> ModelGraph {
        let mut b = GraphBuilder::new();
        b.add_node("a", "A", Some(1.0));
        b.add_node("b", "B", Some(0.0));
        b.add_edge("a", "b", 0.5);
        b.build().unwrap()
    }

    #[test]
    fn negative_threshold_rejected() {
        let g = chain();
        let input = RunInput::new(State::from(vec![1.0, 0.0]), ClampSet::drivers_only(&g));
        let params = PropagationParams {
            threshold: -0.1,
            ..Default::default()
        };
        let err = propagate(&g, &input, &params).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameters { .. }));
    }

    #[test]
    fn nan_threshold_rejected() {
        let params = PropagationParams {
            threshold: Real::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn mismatched_state_rejected() {
        let g = chain();
        let input = RunInput::new(State::from(vec![1.0]), ClampSet::drivers_only(&g));
        let err = propagate(&g, &input, &PropagationParams::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidModel { .. }));
    }

    #[test]
    fn series_starts_with_initial_state() {
        let g = chain();
        let input = RunInput::new(State::from(vec![1.0, 0.0]), ClampSet::drivers_only(&g));
        let out = propagate(&g, &input, &PropagationParams::default()).unwrap();
        for (slot, node) in g.nodes().iter().enumerate() {
            let s = out.series_of(node.id);
            assert_eq!(s.len(), out.iterations + 1);
            assert_eq!(s[0], input.initial.as_slice()[slot]);
            assert_eq!(*s.last().unwrap(), out.final_state.as_slice()[slot]);
        }
    }

    #[test]
    fn unconnected_sigmoid_node_settles_at_half() {
        let mut b = GraphBuilder::new();
        b.add_node("x", "X", Some(0.9));
        let g = b.build().unwrap();
        let input = RunInput::new(State::from(vec![0.9]), ClampSet::drivers_only(&g));
        let out = propagate(&g, &input, &PropagationParams::default()).unwrap();
        assert_eq!(out.final_state.as_slice(), &[0.5]);
        assert!(out.converged);
        assert_eq!(out.iterations, 2);
    }
}
