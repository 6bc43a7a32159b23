//! Error types for the fcm-app service layer.

use std::path::PathBuf;

use fcm_project::{ProjectError, ValidationError};
use fcm_sim::SimError;

/// Application error type shared by every frontend.
///
/// `InvalidModel` and `InvalidParameters` are the two request-level failure
/// classes; everything else is an I/O or document problem around them.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fcm-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn is_invalid_model(&self) -> bool {
        matches!(self, AppError::InvalidModel(_))
    }

    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, AppError::InvalidParameters(_))
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        if err.is_parameter_error() {
            AppError::InvalidParameters(err.to_string())
        } else {
            AppError::InvalidModel(err.to_string())
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Validation(v) => v.into(),
            ProjectError::Io(e) => AppError::Io(e),
            other => AppError::Document(other.to_string()),
        }
    }
}

impl From<SimError> for AppError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::InvalidModel { what } => AppError::InvalidModel(what),
            SimError::InvalidParameters { what } => AppError::InvalidParameters(what),
        }
    }
}

impl From<fcm_graph::GraphError> for AppError {
    fn from(err: fcm_graph::GraphError) -> Self {
        AppError::InvalidModel(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Document(err.to_string())
    }
}
