//! Packaging engine output into response documents.

use fcm_graph::ModelGraph;
use fcm_project::schema::{NodeStateDef, NodeStateMap, SeriesMap, SimulationResponse, ValueMapDef};
use fcm_sim::{DeltaState, RunOutcome, SimulationRun, State};

/// Full node records (id, label, value) for a state vector.
pub fn node_states(graph: &ModelGraph, state: &State) -> NodeStateMap {
    graph
        .nodes()
        .iter()
        .filter_map(|node| {
            let value = state.get(node.id)?;
            Some((
                node.key.clone(),
                NodeStateDef {
                    id: node.key.clone(),
                    label: node.label.clone(),
                    value,
                },
            ))
        })
        .collect()
}

pub fn value_map(graph: &ModelGraph, state: &State) -> ValueMapDef {
    state.keyed(graph).map(|(k, v)| (k.to_string(), v)).collect()
}

pub fn series_map(graph: &ModelGraph, outcome: &RunOutcome) -> SeriesMap {
    graph
        .nodes()
        .iter()
        .map(|node| (node.key.clone(), outcome.series_of(node.id).to_vec()))
        .collect()
}

pub fn delta_map(graph: &ModelGraph, delta: &DeltaState) -> ValueMapDef {
    delta
        .iter()
        .filter_map(|(id, d)| graph.node(id).map(|node| (node.key.clone(), d)))
        .collect()
}

/// Build the response for a finished run.
///
/// `clamped` is echoed back verbatim when the request supplied it.
pub fn assemble_response(
    graph: &ModelGraph,
    initial: &State,
    run: &SimulationRun,
    clamped: Option<&[String]>,
) -> SimulationResponse {
    let mut response = SimulationResponse {
        final_state: node_states(graph, &run.primary.final_state),
        time_series: series_map(graph, &run.primary),
        iterations: run.primary.iterations,
        converged: run.primary.converged,
        initial_values: value_map(graph, initial),
        clamped_nodes: clamped.map(<[String]>::to_vec),
        ..Default::default()
    };

    if let Some(baseline) = &run.baseline {
        response.baseline_final_state = Some(node_states(graph, &baseline.outcome.final_state));
        response.baseline_time_series = Some(series_map(graph, &baseline.outcome));
        response.baseline_iterations = Some(baseline.outcome.iterations);
        response.baseline_converged = Some(baseline.outcome.converged);
        response.delta_state = Some(delta_map(graph, &baseline.delta));
    }

    response
}
