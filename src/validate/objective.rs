//! Objective, algorithm and trial-count rules.

use crate::manifest::{CollaboratorCall, ManifestGenerator};
use crate::spec::{AlgorithmSpec, ExperimentSpec, ObjectiveSpec, ObjectiveType};
use crate::validate::{ValidationError, ValidationResult};

pub fn validate_objective(objective: Option<&ObjectiveSpec>) -> ValidationResult<()> {
    let Some(objective) = objective else {
        return Err(ValidationError::InvalidObjective {
            field: "spec.objective",
            reason: "must be specified".to_string(),
        });
    };

    match objective.objective_type {
        ObjectiveType::Minimize | ObjectiveType::Maximize => {}
        ObjectiveType::Unknown => {
            return Err(ValidationError::InvalidObjective {
                field: "spec.objective.type",
                reason: "must be minimize or maximize".to_string(),
            });
        }
    }

    if objective.objective_metric_name.is_empty() {
        return Err(ValidationError::InvalidObjective {
            field: "spec.objective.objectiveMetricName",
            reason: "must not be empty".to_string(),
        });
    }

    if objective
        .additional_metric_names
        .iter()
        .any(|m| *m == objective.objective_metric_name)
    {
        return Err(ValidationError::InvalidObjective {
            field: "spec.objective.additionalMetricNames",
            reason: format!(
                "must not contain the objective metric {:?}",
                objective.objective_metric_name
            ),
        });
    }

    Ok(())
}

/// Requires an algorithm name and a suggestion service registered for it.
pub fn validate_algorithm(
    algorithm: Option<&AlgorithmSpec>,
    generator: &dyn ManifestGenerator,
) -> ValidationResult<()> {
    let Some(algorithm) = algorithm else {
        return Err(ValidationError::InvalidAlgorithm(
            "spec.algorithm must be specified".to_string(),
        ));
    };
    if algorithm.algorithm_name.is_empty() {
        return Err(ValidationError::InvalidAlgorithm(
            "spec.algorithm.algorithmName must not be empty".to_string(),
        ));
    }

    generator
        .suggestion_config(&algorithm.algorithm_name)
        .map_err(ValidationError::collaborator(CollaboratorCall::SuggestionConfig))?;
    Ok(())
}

pub fn validate_trial_counts(spec: &ExperimentSpec) -> ValidationResult<()> {
    let counts = [
        ("spec.maxFailedTrialCount", spec.max_failed_trial_count),
        ("spec.maxTrialCount", spec.max_trial_count),
        ("spec.parallelTrialCount", spec.parallel_trial_count),
    ];
    for (field, value) in counts {
        if let Some(v) = value {
            if v < 0 {
                return Err(ValidationError::InvalidCount { field, value: v });
            }
        }
    }
    Ok(())
}
