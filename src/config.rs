//! Admission configuration: registered suggestion services, collector
//! images, frozen fields, accepted workloads and config-map templates.
//!
//! YAML shape (every section optional; missing sections keep the defaults):
//! suggestions:
//!   random: { image: docker.io/kubeflowkatib/suggestion-hyperopt:latest }
//! metricsCollectors:
//!   StdOut: { image: docker.io/kubeflowkatib/file-metrics-collector:latest }
//! frozenFields: [algorithmName, resumePolicy]
//! workloads:
//!   - { apiVersion: batch/v1, kind: Job }
//! trialTemplates:
//!   - configMapNamespace: kubeflow
//!     configMapName: trial-templates
//!     templatePath: defaultTrialTemplate.yaml
//!     template: |
//!       apiVersion: batch/v1
//!       ...

use crate::Result;
use crate::validate::{FrozenField, ValidatorConfig, WorkloadKind};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const SUGGESTION_IMAGES: &[(&str, &str)] = &[
    ("random", "docker.io/kubeflowkatib/suggestion-hyperopt:latest"),
    ("tpe", "docker.io/kubeflowkatib/suggestion-hyperopt:latest"),
    ("multivariate-tpe", "docker.io/kubeflowkatib/suggestion-optuna:latest"),
    ("grid", "docker.io/kubeflowkatib/suggestion-optuna:latest"),
    ("hyperband", "docker.io/kubeflowkatib/suggestion-hyperband:latest"),
    ("bayesianoptimization", "docker.io/kubeflowkatib/suggestion-skopt:latest"),
    ("cmaes", "docker.io/kubeflowkatib/suggestion-goptuna:latest"),
    ("sobol", "docker.io/kubeflowkatib/suggestion-goptuna:latest"),
    ("enas", "docker.io/kubeflowkatib/suggestion-enas:latest"),
    ("darts", "docker.io/kubeflowkatib/suggestion-darts:latest"),
    ("pbt", "docker.io/kubeflowkatib/suggestion-pbt:latest"),
];

const COLLECTOR_IMAGES: &[(&str, &str)] = &[
    ("StdOut", "docker.io/kubeflowkatib/file-metrics-collector:latest"),
    ("File", "docker.io/kubeflowkatib/file-metrics-collector:latest"),
    ("TfEvent", "docker.io/kubeflowkatib/tfevent-metrics-collector:latest"),
    ("PrometheusMetric", "docker.io/kubeflowkatib/prometheus-metrics-collector:latest"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdmissionConfig {
    /// Algorithm name -> suggestion settings (at least `image`).
    pub suggestions: BTreeMap<String, BTreeMap<String, String>>,

    /// Collector kind tag -> sidecar image.
    pub metrics_collectors: BTreeMap<String, CollectorImage>,

    pub frozen_fields: Vec<FrozenField>,

    pub workloads: Vec<WorkloadKind>,

    pub trial_templates: Vec<TemplateEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorImage {
    pub image: String,
}

/// Template text registered under a config-map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    pub config_map_namespace: String,
    pub config_map_name: String,
    pub template_path: String,
    pub template: String,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        let suggestions = SUGGESTION_IMAGES
            .iter()
            .map(|(name, image)| {
                let settings = BTreeMap::from([("image".to_string(), image.to_string())]);
                (name.to_string(), settings)
            })
            .collect();
        let metrics_collectors = COLLECTOR_IMAGES
            .iter()
            .map(|(kind, image)| {
                let image = CollectorImage {
                    image: image.to_string(),
                };
                (kind.to_string(), image)
            })
            .collect();

        Self {
            suggestions,
            metrics_collectors,
            frozen_fields: FrozenField::DEFAULT.to_vec(),
            workloads: WorkloadKind::defaults(),
            trial_templates: Vec::new(),
        }
    }
}

impl AdmissionConfig {
    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
        let is_json = Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            serde_json::from_str(&text).with_context(|| format!("parse config file {}", path))?
        } else {
            serde_yaml::from_str(&text).with_context(|| format!("parse config file {}", path))?
        };
        Ok(config)
    }

    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            frozen_fields: self.frozen_fields.clone(),
            workloads: self.workloads.clone(),
        }
    }
}
