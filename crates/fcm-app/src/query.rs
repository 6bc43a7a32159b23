//! Query helpers for extracting data from simulation responses.

use fcm_project::schema::SimulationResponse;

use crate::error::{AppError, AppResult};

/// Summary of a finished simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub node_count: usize,
    pub iterations: usize,
    pub converged: bool,
    pub has_baseline: bool,
    pub baseline_iterations: Option<usize>,
    pub baseline_converged: Option<bool>,
    /// Node with the largest absolute delta, if a baseline was run.
    pub largest_delta: Option<(String, f64)>,
}

pub fn get_run_summary(response: &SimulationResponse) -> RunSummary {
    let largest_delta = response.delta_state.as_ref().and_then(|delta| {
        delta
            .iter()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(k, v)| (k.clone(), *v))
    });

    RunSummary {
        node_count: response.final_state.len(),
        iterations: response.iterations,
        converged: response.converged,
        has_baseline: response.baseline_final_state.is_some(),
        baseline_iterations: response.baseline_iterations,
        baseline_converged: response.baseline_converged,
        largest_delta,
    }
}

/// List all node IDs in a response.
pub fn list_node_ids(response: &SimulationResponse) -> Vec<String> {
    response.final_state.keys().cloned().collect()
}

/// Extract `(iteration, value)` pairs for one node.
pub fn extract_node_series(
    response: &SimulationResponse,
    node_id: &str,
    baseline: bool,
) -> AppResult<Vec<(usize, f64)>> {
    let series = if baseline {
        response
            .baseline_time_series
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("Response has no baseline run".to_string()))?
    } else {
        &response.time_series
    };

    let values = series
        .get(node_id)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown node: {}", node_id)))?;

    Ok(values.iter().copied().enumerate().collect())
}

/// Render a series as `iteration,value` CSV.
pub fn series_to_csv(series: &[(usize, f64)]) -> String {
    let mut csv = String::from("iteration,value\n");
    for (t, val) in series {
        csv.push_str(&format!("{},{}\n", t, val));
    }
    csv
}
