//! Scenario records: a run's inputs and result saved under a name.
//!
//! A scenario keeps the intervention, not the model defaults: its
//! `initialValues` are the request's `scenarioInitialValues` with the
//! request-level `initialValues` written over them. Model-level overrides
//! and stored node values belong to the model and are left out.

use chrono::Utc;
use fcm_project::ValueMapDef;
use fcm_project::schema::{ScenarioDef, SimulationParamsDef, SimulationRequest};
use uuid::Uuid;

use crate::compile::resolve_params;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::run_service::{RunOptions, run_simulation};

/// Run `request` and wrap inputs and result into a new scenario.
pub fn create_scenario(
    name: &str,
    model_id: &str,
    request: SimulationRequest,
    config: &AppConfig,
    options: &RunOptions,
) -> AppResult<ScenarioDef> {
    let request = fcm_project::migrate_request(request);
    let params = resolve_params(&request, &config.defaults)?;
    let initial_values = scenario_overrides(&request);
    let clamped_nodes = request.clamped_nodes.clone().unwrap_or_default();

    let run = run_simulation(request, config, options)?;

    Ok(ScenarioDef {
        id: Uuid::new_v4(),
        name: name.to_string(),
        model_id: model_id.to_string(),
        initial_values,
        created_at: Utc::now(),
        simulation_params: SimulationParamsDef {
            activation: params.activation,
            threshold: params.threshold,
            max_iterations: params.max_iterations,
        },
        clamped_nodes,
        result: Some(run.response),
    })
}

/// Scenario layer merged with the request layer on top, limited to nodes
/// the request actually has.
pub fn scenario_overrides(request: &SimulationRequest) -> ValueMapDef {
    request
        .scenario_initial_values
        .iter()
        .chain(request.initial_values.iter())
        .flatten()
        .filter(|(key, _)| request.nodes.iter().any(|n| &n.id == *key))
        .map(|(k, v)| (k.clone(), *v))
        .collect()
}
