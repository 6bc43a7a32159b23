//! fcm-project: document formats (requests, responses, models, scenarios)
//! and their validation.

pub mod migrate;
pub mod schema;
pub mod validate;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use migrate::migrate_request;
pub use schema::*;
pub use validate::{ValidationError, validate_graph, validate_model, validate_request};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

pub fn from_str<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> ProjectResult<T> {
    Ok(match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    })
}

pub fn to_string<T: Serialize>(value: &T, format: DocumentFormat) -> ProjectResult<String> {
    Ok(match format {
        DocumentFormat::Json => serde_json::to_string_pretty(value)?,
        DocumentFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

pub fn load_document<T: DeserializeOwned>(path: &Path) -> ProjectResult<T> {
    let content = std::fs::read_to_string(path)?;
    from_str(&content, DocumentFormat::from_path(path))
}

pub fn save_document<T: Serialize>(path: &Path, value: &T) -> ProjectResult<()> {
    let content = to_string(value, DocumentFormat::from_path(path))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load, migrate and validate a simulation request.
pub fn load_request(path: &Path) -> ProjectResult<SimulationRequest> {
    let request: SimulationRequest = load_document(path)?;
    let request = migrate_request(request);
    validate_request(&request)?;
    Ok(request)
}

pub fn load_model(path: &Path) -> ProjectResult<ModelDef> {
    let model: ModelDef = load_document(path)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn save_model(path: &Path, model: &ModelDef) -> ProjectResult<()> {
    validate_model(model)?;
    save_document(path, model)
}

pub fn load_scenario(path: &Path) -> ProjectResult<ScenarioDef> {
    load_document(path)
}

pub fn save_scenario(path: &Path, scenario: &ScenarioDef) -> ProjectResult<()> {
    save_document(path, scenario)
}
