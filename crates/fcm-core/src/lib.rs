//! fcm-core: stable foundation for the FCM engine.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - activation (the pointwise nonlinearities applied to weighted inputs)
//! - ids (compact dense IDs for graph objects)
//! - error (shared error types)

pub mod activation;
pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use activation::Activation;
pub use error::{FcmError, FcmResult};
pub use ids::*;
pub use numeric::*;
