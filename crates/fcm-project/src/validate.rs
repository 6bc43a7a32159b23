//! Document validation logic.
//!
//! Structural checks only: ids, references, presence of numbers, and the
//! propagation parameters. Anything deeper is the engine's business.

use std::collections::HashSet;

use fcm_core::Activation;

use crate::schema::{EdgeDef, ModelDef, NodeDef, SCHEMA_VERSION, SimulationRequest};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Missing value: {field} ({context})")]
    MissingValue { field: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported schema version: {version}")]
    UnsupportedVersion { version: String },
}

impl ValidationError {
    /// True when the problem is with run parameters rather than the graph.
    pub fn is_parameter_error(&self) -> bool {
        match self {
            ValidationError::InvalidValue { field, .. } => {
                matches!(field.as_str(), "activation" | "threshold" | "maxIterations")
            }
            ValidationError::UnsupportedVersion { .. } => true,
            _ => false,
        }
    }
}

pub fn validate_request(request: &SimulationRequest) -> Result<(), ValidationError> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: request.schema_version.clone(),
        });
    }

    if request.nodes.is_empty() {
        return Err(ValidationError::MissingValue {
            field: "nodes".to_string(),
            context: "request must contain at least one node".to_string(),
        });
    }

    validate_graph(&request.nodes, &request.edges, "request")?;
    validate_parameters(
        request.activation.as_deref(),
        request.threshold,
        request.max_iterations,
    )
}

pub fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    validate_graph(&model.nodes, &model.edges, &format!("model '{}'", model.id))?;
    if let Some(params) = &model.simulation_params {
        let max_iterations =
            i64::try_from(params.max_iterations).map_err(|_| ValidationError::InvalidValue {
                field: "maxIterations".to_string(),
                value: params.max_iterations.to_string(),
                reason: "out of range".to_string(),
            })?;
        validate_parameters(
            Some(params.activation.name()),
            Some(params.threshold),
            Some(max_iterations),
        )?;
    }
    Ok(())
}

/// Node ids unique and non-empty, edges weighted and pointing at known nodes.
pub fn validate_graph(
    nodes: &[NodeDef],
    edges: &[EdgeDef],
    context: &str,
) -> Result<(), ValidationError> {
    let mut node_ids = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if node.id.is_empty() {
            return Err(ValidationError::MissingValue {
                field: "id".to_string(),
                context: format!("{context} nodes"),
            });
        }
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: format!("{context} nodes"),
            });
        }
    }

    for edge in edges {
        for end in [&edge.source, &edge.target] {
            if !node_ids.contains(end.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: end.clone(),
                    context: format!("{context} edge {} -> {}", edge.source, edge.target),
                });
            }
        }
        if edge.weight().is_none() {
            return Err(ValidationError::MissingValue {
                field: "weight".to_string(),
                context: format!("{context} edge {} -> {}", edge.source, edge.target),
            });
        }
    }

    Ok(())
}

/// Checks for whichever parameters are present; absent ones take defaults later.
pub fn validate_parameters(
    activation: Option<&str>,
    threshold: Option<f64>,
    max_iterations: Option<i64>,
) -> Result<(), ValidationError> {
    if let Some(name) = activation
        && name.parse::<Activation>().is_err()
    {
        return Err(ValidationError::InvalidValue {
            field: "activation".to_string(),
            value: name.to_string(),
            reason: "expected one of sigmoid, tanh, relu, linear".to_string(),
        });
    }

    if let Some(t) = threshold
        && !(t.is_finite() && t >= 0.0)
    {
        return Err(ValidationError::InvalidValue {
            field: "threshold".to_string(),
            value: t.to_string(),
            reason: "must be a finite, non-negative number".to_string(),
        });
    }

    if let Some(n) = max_iterations
        && n <= 0
    {
        return Err(ValidationError::InvalidValue {
            field: "maxIterations".to_string(),
            value: n.to_string(),
            reason: "must be positive".to_string(),
        });
    }

    Ok(())
}
