//! Simulation execution service.

use std::path::Path;
use std::time::Instant;

use fcm_project::schema::SimulationRequest;
use fcm_project::{load_document, migrate_request, validate_request};
use tracing::info;

use crate::assemble::assemble_response;
use crate::compile::compile_request;
use crate::config::AppConfig;
use crate::error::AppResult;

/// Caller-side switches that override the request document.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Force the baseline comparison on (or off) regardless of the request.
    pub compare_to_baseline: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub propagate_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub response: fcm_project::SimulationResponse,
    pub timing: RunTimingSummary,
}

/// Migrate, validate, compile and run one request.
pub fn run_simulation(
    request: SimulationRequest,
    config: &AppConfig,
    options: &RunOptions,
) -> AppResult<RunResponse> {
    let started = Instant::now();

    let mut request = migrate_request(request);
    if let Some(flag) = options.compare_to_baseline {
        request.compare_to_baseline = Some(flag);
    }
    validate_request(&request)?;

    let compiled = compile_request(&request, &config.defaults)?;
    let compile_time_s = started.elapsed().as_secs_f64();

    let propagate_start = Instant::now();
    let run = fcm_sim::simulate(
        &compiled.graph,
        &compiled.params,
        &compiled.primary,
        compiled.baseline.as_ref(),
    )?;
    let propagate_time_s = propagate_start.elapsed().as_secs_f64();

    let response = assemble_response(
        &compiled.graph,
        &compiled.primary.initial,
        &run,
        request.clamped_nodes.as_deref(),
    );

    info!(
        nodes = compiled.graph.node_count(),
        iterations = response.iterations,
        converged = response.converged,
        baseline = response.baseline_iterations.is_some(),
        "simulation finished"
    );

    Ok(RunResponse {
        response,
        timing: RunTimingSummary {
            compile_time_s,
            propagate_time_s,
            total_time_s: started.elapsed().as_secs_f64(),
        },
    })
}

/// Load a request document (JSON or YAML) and run it.
pub fn run_request_file(
    path: &Path,
    config: &AppConfig,
    options: &RunOptions,
) -> AppResult<RunResponse> {
    let request: SimulationRequest = load_document(path)?;
    run_simulation(request, config, options)
}

/// Load, migrate and validate without running.
pub fn check_request_file(path: &Path) -> AppResult<SimulationRequest> {
    Ok(fcm_project::load_request(path)?)
}
