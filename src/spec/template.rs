//! Trial template reference.
//!
//! The template text is either inline (`rawTemplate`) or stored in a config
//! map. Placeholders understood by the renderer:
//! ${trialName}, ${namespace}, ${experimentName}, ${trialParameters.<name>}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapSource>,

    #[serde(default)]
    pub trial_parameters: Vec<TrialParameterSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapSource {
    #[serde(default)]
    pub config_map_name: String,

    #[serde(default)]
    pub config_map_namespace: String,

    #[serde(default)]
    pub template_path: String,
}

/// Binds a template placeholder to an experiment parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialParameterSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub reference: String,
}
