//! Admission checks for hyperparameter-tuning Experiments.
//!
//! `validate::ExperimentValidator` decides whether a proposed Experiment (and,
//! on update, the change from the accepted version) may be admitted.
//! `admission` wraps it in the AdmissionReview envelope; `manifest` is the
//! seam to the trial manifest generator.

pub mod admission;
pub mod config;
pub mod manifest;
pub mod spec;
pub mod validate;

pub type Result<T> = anyhow::Result<T>;

pub use admission::{Decision, decide, review};
pub use config::AdmissionConfig;
pub use manifest::{FakeGenerator, ManifestGenerator, TemplateGenerator};
pub use spec::Experiment;
pub use validate::{ExperimentValidator, ValidationError, ValidatorConfig};
