//! Deterministic generator for tests: canned answers, optional failures.

use crate::manifest::{GenerationError, ManifestGenerator};
use crate::spec::{CollectorKind, Experiment};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct FakeGenerator {
    run_spec: String,
    render_error: Option<String>,
    image_error: Option<String>,
    suggestion_error: Option<String>,
    render_calls: AtomicUsize,
}

impl FakeGenerator {
    /// Every `render_run_spec` call returns `run_spec`.
    pub fn new(run_spec: impl Into<String>) -> Self {
        Self {
            run_spec: run_spec.into(),
            ..Default::default()
        }
    }

    pub fn fail_render(mut self, message: &str) -> Self {
        self.render_error = Some(message.to_string());
        self
    }

    pub fn fail_metrics_collector_image(mut self, message: &str) -> Self {
        self.image_error = Some(message.to_string());
        self
    }

    pub fn fail_suggestion_config(mut self, message: &str) -> Self {
        self.suggestion_error = Some(message.to_string());
        self
    }

    pub fn render_calls(&self) -> usize {
        self.render_calls.load(Ordering::SeqCst)
    }
}

fn fail_with(error: &Option<String>) -> Result<(), GenerationError> {
    match error {
        Some(message) => Err(GenerationError::Unavailable(message.clone())),
        None => Ok(()),
    }
}

impl ManifestGenerator for FakeGenerator {
    fn render_run_spec(&self, _experiment: &Experiment) -> Result<String, GenerationError> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        fail_with(&self.render_error)?;
        Ok(self.run_spec.clone())
    }

    fn metrics_collector_image(&self, _kind: &CollectorKind) -> Result<String, GenerationError> {
        fail_with(&self.image_error)?;
        Ok("metricsCollectorImage".to_string())
    }

    fn suggestion_config(
        &self,
        _algorithm_name: &str,
    ) -> Result<BTreeMap<String, String>, GenerationError> {
        fail_with(&self.suggestion_error)?;
        Ok(BTreeMap::from([(
            "image".to_string(),
            "algorithmImage".to_string(),
        )]))
    }
}
