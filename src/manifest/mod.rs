//! Manifest generator seam.
//!
//! The validator never renders templates or reads cluster configuration
//! itself. It asks a `ManifestGenerator` for:
//! - the trial run spec rendered from the experiment's trial template
//! - the sidecar image for a metrics collector kind
//! - the suggestion settings registered for an algorithm
//!
//! `TemplateGenerator` is the production adapter. `FakeGenerator` returns
//! canned answers for tests.

pub mod fake;
pub mod render;

pub use fake::FakeGenerator;
pub use render::TemplateGenerator;

use crate::spec::{CollectorKind, Experiment};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub trait ManifestGenerator: Send + Sync {
    /// Render the run spec of a trial of `experiment`, named by
    /// [`expected_trial_name`], in the experiment's namespace.
    fn render_run_spec(&self, experiment: &Experiment) -> Result<String, GenerationError>;

    fn metrics_collector_image(&self, kind: &CollectorKind) -> Result<String, GenerationError>;

    fn suggestion_config(
        &self,
        algorithm_name: &str,
    ) -> Result<BTreeMap<String, String>, GenerationError>;
}

/// Name given to the trial rendered at admission time.
pub fn expected_trial_name(experiment: &Experiment) -> String {
    format!("{}-trial", experiment.name())
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("experiment has no trial template")]
    MissingTemplate,

    #[error("trial template sets both rawTemplate and configMap")]
    AmbiguousTemplate,

    #[error("template {path:?} not found in config map {namespace}/{name}")]
    TemplateNotFound {
        namespace: String,
        name: String,
        path: String,
    },

    #[error("placeholder ${{{0}}} is not declared")]
    UndeclaredPlaceholder(String),

    #[error("trial parameter {name:?} references unknown parameter {reference:?}")]
    UnknownReference { name: String, reference: String },

    #[error("{what} {key:?} is not configured")]
    NotConfigured { what: &'static str, key: String },

    #[error("{0}")]
    Unavailable(String),
}

/// Which collaborator call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorCall {
    RenderRunSpec,
    MetricsCollectorImage,
    SuggestionConfig,
}

impl fmt::Display for CollaboratorCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollaboratorCall::RenderRunSpec => f.write_str("render run spec"),
            CollaboratorCall::MetricsCollectorImage => f.write_str("get metrics collector image"),
            CollaboratorCall::SuggestionConfig => f.write_str("get suggestion config"),
        }
    }
}
