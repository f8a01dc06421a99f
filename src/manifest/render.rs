//! Production generator backed by `AdmissionConfig`.
//!
//! Rendering replaces `${...}` placeholders in the template text:
//! - ${trialName}       expected trial name
//! - ${namespace}       experiment namespace
//! - ${experimentName}  experiment name
//! - ${trialParameters.<name>}  sample value of the referenced parameter
//!
//! Any other placeholder is an error, so template typos surface at admission.

use crate::config::AdmissionConfig;
use crate::manifest::{GenerationError, ManifestGenerator, expected_trial_name};
use crate::spec::{CollectorKind, Experiment, TrialTemplate};
use regex::Regex;
use std::collections::BTreeMap;

const PLACEHOLDER_RE: &str = r"\$\{([^}]*)\}";

/// Config-map templates are keyed by (namespace, name, path).
type TemplateKey = (String, String, String);

#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    suggestions: BTreeMap<String, BTreeMap<String, String>>,
    collector_images: BTreeMap<String, String>,
    templates: BTreeMap<TemplateKey, String>,
    placeholder: Regex,
}

impl TemplateGenerator {
    pub fn new(config: &AdmissionConfig) -> crate::Result<Self> {
        let collector_images = config
            .metrics_collectors
            .iter()
            .map(|(kind, c)| (kind.clone(), c.image.clone()))
            .collect();
        let templates = config
            .trial_templates
            .iter()
            .map(|t| {
                let key = (
                    t.config_map_namespace.clone(),
                    t.config_map_name.clone(),
                    t.template_path.clone(),
                );
                (key, t.template.clone())
            })
            .collect();

        Ok(Self {
            suggestions: config.suggestions.clone(),
            collector_images,
            templates,
            placeholder: Regex::new(PLACEHOLDER_RE)?,
        })
    }

    fn template_text<'a>(&'a self, template: &'a TrialTemplate) -> Result<&'a str, GenerationError> {
        match (&template.raw_template, &template.config_map) {
            (Some(_), Some(_)) => Err(GenerationError::AmbiguousTemplate),
            (Some(raw), None) => Ok(raw),
            (None, Some(cm)) => {
                let key = (
                    cm.config_map_namespace.clone(),
                    cm.config_map_name.clone(),
                    cm.template_path.clone(),
                );
                self.templates
                    .get(&key)
                    .map(String::as_str)
                    .ok_or_else(|| GenerationError::TemplateNotFound {
                        namespace: cm.config_map_namespace.clone(),
                        name: cm.config_map_name.clone(),
                        path: cm.template_path.clone(),
                    })
            }
            (None, None) => Err(GenerationError::MissingTemplate),
        }
    }

    /// Placeholder values for one rendering of `experiment`.
    fn bindings(
        &self,
        experiment: &Experiment,
        template: &TrialTemplate,
    ) -> Result<BTreeMap<String, String>, GenerationError> {
        let mut values = BTreeMap::new();
        values.insert("trialName".to_string(), expected_trial_name(experiment));
        values.insert("namespace".to_string(), experiment.namespace().to_string());
        values.insert("experimentName".to_string(), experiment.name().to_string());

        for tp in &template.trial_parameters {
            let param = experiment
                .spec
                .parameters
                .iter()
                .find(|p| p.name == tp.reference)
                .ok_or_else(|| GenerationError::UnknownReference {
                    name: tp.name.clone(),
                    reference: tp.reference.clone(),
                })?;
            values.insert(
                format!("trialParameters.{}", tp.name),
                param.sample_value().unwrap_or_default(),
            );
        }
        Ok(values)
    }

    fn substitute(&self, text: &str, values: &BTreeMap<String, String>) -> Result<String, GenerationError> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.placeholder.captures_iter(text) {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = values
                .get(key.as_str())
                .ok_or_else(|| GenerationError::UndeclaredPlaceholder(key.as_str().to_string()))?;
            out.push_str(&text[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}

impl ManifestGenerator for TemplateGenerator {
    fn render_run_spec(&self, experiment: &Experiment) -> Result<String, GenerationError> {
        let template = experiment
            .spec
            .trial_template
            .as_ref()
            .ok_or(GenerationError::MissingTemplate)?;
        let text = self.template_text(template)?;
        let values = self.bindings(experiment, template)?;
        self.substitute(text, &values)
    }

    fn metrics_collector_image(&self, kind: &CollectorKind) -> Result<String, GenerationError> {
        let key = kind.to_string();
        self.collector_images
            .get(&key)
            .cloned()
            .ok_or(GenerationError::NotConfigured {
                what: "metrics collector",
                key,
            })
    }

    fn suggestion_config(
        &self,
        algorithm_name: &str,
    ) -> Result<BTreeMap<String, String>, GenerationError> {
        self.suggestions
            .get(algorithm_name)
            .cloned()
            .ok_or_else(|| GenerationError::NotConfigured {
                what: "suggestion algorithm",
                key: algorithm_name.to_string(),
            })
    }
}
