//! Experiment resource as delivered by the admission host.
//!
//! YAML shape (abridged):
//! apiVersion: kubeflow.org/v1beta1
//! kind: Experiment
//! metadata:
//!   name: random-example
//!   namespace: kubeflow
//! spec:
//!   objective: { type: maximize, objectiveMetricName: accuracy }
//!   algorithm: { algorithmName: random }
//!   parameters: [ ... ]
//!   metricsCollectorSpec: { collector: { kind: StdOut } }
//!   trialTemplate: { rawTemplate: "...", trialParameters: [ ... ] }

use crate::spec::{
    AlgorithmSpec, MetricsCollectorSpec, NasConfig, ObjectiveSpec, ParameterSpec, TrialTemplate,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: ExperimentSpec,
}

impl Experiment {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }
}

/// Identity of the object. Labels and annotations are ignored here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentSpec {
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,

    #[serde(default)]
    pub objective: Option<ObjectiveSpec>,

    #[serde(default)]
    pub algorithm: Option<AlgorithmSpec>,

    #[serde(default)]
    pub trial_template: Option<TrialTemplate>,

    #[serde(default)]
    pub parallel_trial_count: Option<i32>,

    #[serde(default)]
    pub max_trial_count: Option<i32>,

    #[serde(default)]
    pub max_failed_trial_count: Option<i32>,

    #[serde(default)]
    pub metrics_collector_spec: Option<MetricsCollectorSpec>,

    #[serde(default)]
    pub nas_config: Option<NasConfig>,

    #[serde(default)]
    pub resume_policy: Option<ResumePolicy>,
}

impl ExperimentSpec {
    /// Resume policy with the cluster default applied.
    pub fn effective_resume_policy(&self) -> ResumePolicy {
        self.resume_policy.unwrap_or_default()
    }
}

/// What happens to the suggestion service once the experiment succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumePolicy {
    #[default]
    Never,
    LongRunning,
    FromVolume,
}

impl fmt::Display for ResumePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResumePolicy::Never => f.write_str("Never"),
            ResumePolicy::LongRunning => f.write_str("LongRunning"),
            ResumePolicy::FromVolume => f.write_str("FromVolume"),
        }
    }
}
