use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveSpec {
    #[serde(rename = "type", default)]
    pub objective_type: ObjectiveType,

    #[serde(default)]
    pub goal: Option<f64>,

    #[serde(default)]
    pub objective_metric_name: String,

    #[serde(default)]
    pub additional_metric_names: Vec<String>,
}

/// Direction of the search. Missing or unrecognized text decodes as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveType {
    Minimize,
    Maximize,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ObjectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveType::Minimize => f.write_str("minimize"),
            ObjectiveType::Maximize => f.write_str("maximize"),
            ObjectiveType::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmSpec {
    #[serde(default)]
    pub algorithm_name: String,

    #[serde(default)]
    pub algorithm_settings: Vec<AlgorithmSetting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmSetting {
    pub name: String,

    #[serde(default)]
    pub value: String,
}
