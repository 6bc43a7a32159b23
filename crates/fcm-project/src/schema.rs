//! Document schema definitions.
//!
//! Field names follow the JSON documents exchanged with the modeling UI
//! (camelCase). Nodes and edges accept both the flat form and the nested
//! graph-editor form where attributes live under `data`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fcm_core::Activation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Node id → value.
pub type ValueMapDef = BTreeMap<String, f64>;

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeDataDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_driver: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_driver: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeDataDef>,
}

impl NodeDef {
    /// Flat node with a label and stored value.
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn driver(mut self) -> Self {
        self.is_driver = Some(true);
        self
    }

    pub fn label(&self) -> &str {
        self.label
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.label.as_deref()))
            .unwrap_or("")
    }

    pub fn stored_value(&self) -> Option<f64> {
        self.value
            .or_else(|| self.data.as_ref().and_then(|d| d.value))
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.kind.as_deref()))
    }

    /// Driver when flagged explicitly or typed `"driver"`.
    pub fn is_driver(&self) -> bool {
        let flag = self
            .is_driver
            .or_else(|| self.data.as_ref().and_then(|d| d.is_driver))
            .unwrap_or(false);
        flag || self.kind() == Some("driver")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EdgeDataDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EdgeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeDataDef>,
}

impl EdgeDef {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: Some(weight),
            ..Default::default()
        }
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
            .or_else(|| self.data.as_ref().and_then(|d| d.weight))
    }
}

/// Just the graph part of any document that carries `nodes`/`edges`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GraphDef {
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

/// How the baseline run's starting state is derived from the request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum BaselinePolicy {
    /// Stored node values, then `baselineInitialValues`.
    #[default]
    StoredDefaults,
    /// Non-drivers start at zero; drivers keep their primary starting value.
    ZeroNonDrivers,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    /// Kept as text so an unknown name is a parameter error, not a parse error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_to_baseline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamped_nodes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_initial_values: Option<ValueMapDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_initial_values: Option<ValueMapDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_values: Option<ValueMapDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_policy: Option<BaselinePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_initial_values: Option<ValueMapDef>,

    // Legacy spellings, folded in by `migrate::migrate_request`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_node_values: Option<ValueMapDef>,

    /// Anything else the sender included.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SimulationRequest {
    pub fn new(nodes: Vec<NodeDef>, edges: Vec<EdgeDef>) -> Self {
        Self {
            schema_version: default_schema_version(),
            nodes,
            edges,
            ..Default::default()
        }
    }

    pub fn wants_baseline(&self) -> bool {
        self.compare_to_baseline.unwrap_or(false)
    }
}

/// A node as reported in results: identity, label and settled value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeStateDef {
    pub id: String,
    pub label: String,
    pub value: f64,
}

pub type NodeStateMap = BTreeMap<String, NodeStateDef>;
pub type SeriesMap = BTreeMap<String, Vec<f64>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResponse {
    pub final_state: NodeStateMap,
    pub time_series: SeriesMap,
    pub iterations: usize,
    pub converged: bool,
    pub initial_values: ValueMapDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_final_state: Option<NodeStateMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_time_series: Option<SeriesMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_converged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_state: Option<ValueMapDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamped_nodes: Option<Vec<String>>,
}

/// Propagation settings as stored alongside models and scenarios.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParamsDef {
    #[serde(default)]
    pub activation: Activation,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_threshold() -> f64 {
    0.001
}

fn default_max_iterations() -> usize {
    100
}

impl Default for SimulationParamsDef {
    fn default() -> Self {
        Self {
            activation: Activation::default(),
            threshold: default_threshold(),
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelDef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_params: Option<SimulationParamsDef>,
}

/// A named set of starting values for a model, optionally with the result of
/// having simulated it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDef {
    pub id: Uuid,
    pub name: String,
    pub model_id: String,
    #[serde(default)]
    pub initial_values: ValueMapDef,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub simulation_params: SimulationParamsDef,
    #[serde(default)]
    pub clamped_nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SimulationResponse>,
}
