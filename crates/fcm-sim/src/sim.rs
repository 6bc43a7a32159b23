//! Simulation runner: primary run plus optional baseline comparison.

use fcm_graph::ModelGraph;
use tracing::debug;

use crate::baseline::{BaselineComparison, delta_state};
use crate::engine::{PropagationParams, RunInput, RunOutcome, propagate};
use crate::error::SimResult;

/// Everything the engine computed for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationRun {
    pub primary: RunOutcome,
    pub baseline: Option<BaselineComparison>,
}

/// Run the primary propagation and, if given, the baseline.
///
/// Both inputs are validated before either run starts, so a bad baseline
/// fails the whole call without a partial primary result. The two runs share
/// nothing mutable and execute on the rayon pool concurrently.
pub fn simulate(
    graph: &ModelGraph,
    params: &PropagationParams,
    primary: &RunInput,
    baseline: Option<&RunInput>,
) -> SimResult<SimulationRun> {
    params.validate()?;
    primary.validate(graph)?;

    let Some(baseline) = baseline else {
        let primary = propagate(graph, primary, params)?;
        return Ok(SimulationRun {
            primary,
            baseline: None,
        });
    };

    baseline.validate(graph)?;
    debug!("running primary and baseline concurrently");

    let (primary, base) = rayon::join(
        || propagate(graph, primary, params),
        || propagate(graph, baseline, params),
    );
    let primary = primary?;
    let base = base?;

    let delta = delta_state(graph, &primary, &base);
    Ok(SimulationRun {
        primary,
        baseline: Some(BaselineComparison {
            outcome: base,
            delta,
        }),
    })
}
