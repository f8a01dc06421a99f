//! Fields frozen once an Experiment has been admitted.

use crate::spec::ExperimentSpec;
use crate::validate::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A spec field that updates must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrozenField {
    AlgorithmName,
    AlgorithmSettings,
    ObjectiveType,
    ObjectiveMetricName,
    ResumePolicy,
}

impl FrozenField {
    pub const DEFAULT: &'static [FrozenField] = &[FrozenField::AlgorithmName, FrozenField::ResumePolicy];

    /// Rendered value of this field in `spec`; absent sub-structures render
    /// as the empty string.
    pub fn value_of(self, spec: &ExperimentSpec) -> String {
        match self {
            FrozenField::AlgorithmName => spec
                .algorithm
                .as_ref()
                .map(|a| a.algorithm_name.clone())
                .unwrap_or_default(),
            FrozenField::AlgorithmSettings => spec
                .algorithm
                .as_ref()
                .map(|a| {
                    a.algorithm_settings
                        .iter()
                        .map(|s| format!("{}={}", s.name, s.value))
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .unwrap_or_default(),
            FrozenField::ObjectiveType => spec
                .objective
                .as_ref()
                .map(|o| o.objective_type.to_string())
                .unwrap_or_default(),
            FrozenField::ObjectiveMetricName => spec
                .objective
                .as_ref()
                .map(|o| o.objective_metric_name.clone())
                .unwrap_or_default(),
            FrozenField::ResumePolicy => spec.effective_resume_policy().to_string(),
        }
    }
}

impl fmt::Display for FrozenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrozenField::AlgorithmName => f.write_str("spec.algorithm.algorithmName"),
            FrozenField::AlgorithmSettings => f.write_str("spec.algorithm.algorithmSettings"),
            FrozenField::ObjectiveType => f.write_str("spec.objective.type"),
            FrozenField::ObjectiveMetricName => f.write_str("spec.objective.objectiveMetricName"),
            FrozenField::ResumePolicy => f.write_str("spec.resumePolicy"),
        }
    }
}

/// Compare `frozen` fields of the prior and proposed spec; the first
/// difference wins.
pub fn check_immutable(
    frozen: &[FrozenField],
    prior: &ExperimentSpec,
    proposed: &ExperimentSpec,
) -> ValidationResult<()> {
    for &field in frozen {
        let old = field.value_of(prior);
        let new = field.value_of(proposed);
        if old != new {
            return Err(ValidationError::ImmutableFieldChanged { field, old, new });
        }
    }
    Ok(())
}
