//! Error types for simulation operations.

use thiserror::Error;

/// Errors that stop a simulation before its first iteration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid model: {what}")]
    InvalidModel { what: String },

    #[error("Invalid parameters: {what}")]
    InvalidParameters { what: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub fn invalid_model(what: impl Into<String>) -> Self {
        SimError::InvalidModel { what: what.into() }
    }

    pub fn invalid_parameters(what: impl Into<String>) -> Self {
        SimError::InvalidParameters { what: what.into() }
    }
}

impl From<fcm_graph::GraphError> for SimError {
    fn from(e: fcm_graph::GraphError) -> Self {
        SimError::InvalidModel {
            what: e.to_string(),
        }
    }
}

impl From<fcm_core::FcmError> for SimError {
    fn from(e: fcm_core::FcmError) -> Self {
        SimError::InvalidParameters {
            what: e.to_string(),
        }
    }
}
