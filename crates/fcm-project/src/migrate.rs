//! Legacy request field migration.
//!
//! Older clients sent `activationFunction` and `initialNodeValues`. They are
//! folded into their current names when the current field is absent.

use tracing::debug;

use crate::schema::SimulationRequest;

/// Fields the UI sends that the engine knowingly ignores.
const IGNORED_FIELDS: &[&str] = &[
    "edgeRules",
    "promotedNodes",
    "interventionScenario",
    "metadata",
    "generateNotebook",
];

pub fn migrate_request(mut request: SimulationRequest) -> SimulationRequest {
    if let Some(legacy) = request.activation_function.take()
        && request.activation.is_none()
    {
        request.activation = Some(legacy);
    }

    if let Some(legacy) = request.initial_node_values.take()
        && request.initial_values.is_none()
    {
        request.initial_values = Some(legacy);
    }

    for key in request.extra.keys() {
        if !IGNORED_FIELDS.contains(&key.as_str()) {
            debug!(field = %key, "unknown request field");
        }
    }

    request
}
