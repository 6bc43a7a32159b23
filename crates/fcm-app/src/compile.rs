//! Request compilation: documents in, engine inputs out.
//!
//! Builds the `ModelGraph`, settles the propagation parameters against the
//! configured defaults, and resolves the primary and (optional) baseline
//! starting states.

use fcm_core::Activation;
use fcm_graph::{GraphBuilder, ModelGraph};
use fcm_project::schema::{BaselinePolicy, EdgeDef, NodeDef, SimulationRequest};
use fcm_sim::{ClampSet, InitialValueResolver, PropagationParams, RunInput, ValueMap};
use tracing::debug;

use crate::config::SimulationDefaults;
use crate::error::{AppError, AppResult};

/// Everything the engine needs for one request.
#[derive(Debug, Clone)]
pub struct CompiledRequest {
    pub graph: ModelGraph,
    pub params: PropagationParams,
    pub primary: RunInput,
    pub baseline: Option<RunInput>,
}

/// Build the graph from node and edge documents.
pub fn build_graph(nodes: &[NodeDef], edges: &[EdgeDef]) -> AppResult<ModelGraph> {
    let mut builder = GraphBuilder::new();
    for node in nodes {
        let id = builder.add_node(node.id.as_str(), node.label(), node.stored_value());
        if node.is_driver() {
            builder.set_driver(id, true);
        }
    }
    for edge in edges {
        let weight = edge.weight().ok_or_else(|| {
            AppError::InvalidModel(format!(
                "edge {} -> {} has no weight",
                edge.source, edge.target
            ))
        })?;
        builder.add_edge(edge.source.as_str(), edge.target.as_str(), weight);
    }
    Ok(builder.build()?)
}

/// Request parameters with config defaults filled in.
pub fn resolve_params(
    request: &SimulationRequest,
    defaults: &SimulationDefaults,
) -> AppResult<PropagationParams> {
    let activation = match request.activation.as_deref() {
        Some(name) => name
            .parse::<Activation>()
            .map_err(|e| AppError::InvalidParameters(e.to_string()))?,
        None => defaults.activation,
    };

    let max_iterations = match request.max_iterations {
        Some(n) if n > 0 => usize::try_from(n).map_err(|_| {
            AppError::InvalidParameters(format!("maxIterations {n} is out of range"))
        })?,
        Some(n) => {
            return Err(AppError::InvalidParameters(format!(
                "maxIterations must be positive, got {n}"
            )));
        }
        None => defaults.max_iterations,
    };

    let params = PropagationParams {
        activation,
        threshold: request.threshold.unwrap_or(defaults.threshold),
        max_iterations,
    };
    params.validate()?;
    Ok(params)
}

/// Compile a migrated, validated request.
pub fn compile_request(
    request: &SimulationRequest,
    defaults: &SimulationDefaults,
) -> AppResult<CompiledRequest> {
    let params = resolve_params(request, defaults)?;
    let graph = build_graph(&request.nodes, &request.edges)?;

    let clamped = ClampSet::new(
        &graph,
        request.clamped_nodes.iter().flatten().map(String::as_str),
    );

    let initial = InitialValueResolver::new()
        .layer("model", request.model_initial_values.as_ref())
        .layer("scenario", request.scenario_initial_values.as_ref())
        .layer("request", request.initial_values.as_ref())
        .resolve(&graph)?;

    let baseline = if request.wants_baseline() {
        let policy = request.baseline_policy.unwrap_or(defaults.baseline_policy);
        debug!(?policy, "resolving baseline starting state");
        let state = match policy {
            BaselinePolicy::StoredDefaults => InitialValueResolver::new()
                .layer("baseline", request.baseline_initial_values.as_ref())
                .resolve(&graph)?,
            BaselinePolicy::ZeroNonDrivers => {
                let seeded: ValueMap = graph
                    .nodes()
                    .iter()
                    .map(|node| {
                        let v = if node.driver {
                            initial.get(node.id).unwrap_or(0.0)
                        } else {
                            0.0
                        };
                        (node.key.clone(), v)
                    })
                    .collect();
                InitialValueResolver::without_stored_values()
                    .layer("zeroNonDrivers", Some(&seeded))
                    .layer("baseline", request.baseline_initial_values.as_ref())
                    .resolve(&graph)?
            }
        };
        Some(RunInput::new(state, clamped.clone()))
    } else {
        None
    };

    Ok(CompiledRequest {
        graph,
        params,
        primary: RunInput::new(initial, clamped),
        baseline,
    })
}
