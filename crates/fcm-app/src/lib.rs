//! Shared application service layer for fcmflow.
//!
//! Turns request documents into engine runs and engine output back into
//! response documents, and hosts the auxiliary services (network analysis,
//! result queries, scenario records) the CLI exposes.

pub mod analysis;
pub mod assemble;
pub mod compile;
pub mod config;
pub mod error;
pub mod query;
pub mod run_service;
pub mod scenario_service;

// Re-export key types for convenience
pub use analysis::{Centrality, NetworkMetrics, analyze_documents, analyze_graph};
pub use assemble::assemble_response;
pub use compile::{CompiledRequest, build_graph, compile_request, resolve_params};
pub use config::{AppConfig, CONFIG_ENV, SimulationDefaults};
pub use error::{AppError, AppResult};
pub use query::{RunSummary, extract_node_series, get_run_summary, list_node_ids, series_to_csv};
pub use run_service::{
    RunOptions, RunResponse, RunTimingSummary, check_request_file, run_request_file,
    run_simulation,
};
pub use scenario_service::create_scenario;
