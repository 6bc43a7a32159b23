//! FCM simulation engine.
//!
//! Provides:
//! - Layered initial-value resolution
//! - Precomputed clamp mask for drivers and per-run frozen nodes
//! - Synchronous propagation to a fixed point or iteration cap
//! - Baseline run and per-node delta computation

pub mod baseline;
pub mod clamp;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod sim;
pub mod state;

// Re-exports for public API
pub use baseline::{BaselineComparison, DeltaState, delta_state};
pub use clamp::ClampSet;
pub use engine::{PropagationParams, RunInput, RunOutcome, propagate};
pub use error::{SimError, SimResult};
pub use resolver::{InitialValueResolver, OverrideLayer, ValueMap};
pub use sim::{SimulationRun, simulate};
pub use state::State;
