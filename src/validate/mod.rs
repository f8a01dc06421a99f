//! Experiment admission rules.
//!
//! `ExperimentValidator::validate` runs the rule groups in a fixed order and
//! returns the first failure:
//! 1) objective
//! 2) algorithm (and its suggestion registration)
//! 3) trial counts
//! 4) frozen fields, on update only
//! 5) search space
//! 6) metrics collector
//! 7) trial template
//!
//! The validator keeps no state between calls; it can be shared across
//! threads behind an `Arc`.

pub mod collector;
pub mod error;
pub mod immutable;
pub mod objective;
pub mod rules;
pub mod search_space;
pub mod template;

pub use error::{ValidationError, ValidationResult};
pub use immutable::FrozenField;
pub use template::WorkloadKind;

use crate::manifest::ManifestGenerator;
use crate::spec::Experiment;
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Fields an update may not change.
    pub frozen_fields: Vec<FrozenField>,
    /// Workloads a rendered trial manifest may declare.
    pub workloads: Vec<WorkloadKind>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            frozen_fields: FrozenField::DEFAULT.to_vec(),
            workloads: WorkloadKind::defaults(),
        }
    }
}

#[derive(Clone)]
pub struct ExperimentValidator {
    generator: Arc<dyn ManifestGenerator>,
    config: ValidatorConfig,
}

impl ExperimentValidator {
    pub fn new(generator: Arc<dyn ManifestGenerator>, config: ValidatorConfig) -> Self {
        Self { generator, config }
    }

    /// Validate `proposed`. `prior` is the accepted version on update and
    /// `None` on create.
    pub fn validate(&self, proposed: &Experiment, prior: Option<&Experiment>) -> ValidationResult<()> {
        let spec = &proposed.spec;
        let generator = self.generator.as_ref();
        debug!(
            "validating experiment {}/{} ({})",
            proposed.namespace(),
            proposed.name(),
            if prior.is_some() { "update" } else { "create" }
        );

        objective::validate_objective(spec.objective.as_ref())?;
        objective::validate_algorithm(spec.algorithm.as_ref(), generator)?;
        objective::validate_trial_counts(spec)?;

        if let Some(prior) = prior {
            immutable::check_immutable(&self.config.frozen_fields, &prior.spec, spec)?;
        }

        search_space::validate_search_space(spec)?;
        collector::validate_metrics_collector(spec.metrics_collector_spec.as_ref(), generator)?;
        template::validate_trial_template(proposed, generator, &self.config.workloads)?;

        debug!("experiment {}/{} is valid", proposed.namespace(), proposed.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FakeGenerator;
    use crate::spec::{
        AlgorithmSetting, AlgorithmSpec, CollectorKind, CollectorSpec, FeasibleSpace,
        MetricsCollectorSpec, NasConfig, ObjectiveSpec, ObjectiveType, Operation, ParameterSpec,
        ParameterType, ResumePolicy,
    };
    use pretty_assertions::assert_eq;

    const JOB: &str = r#"apiVersion: "batch/v1"
kind: "Job"
metadata:
  name: "fake-trial"
  namespace: fakens"#;

    fn fake_instance() -> Experiment {
        let mut exp = Experiment::default();
        exp.metadata.name = "fake".to_string();
        exp.metadata.namespace = "fakens".to_string();
        exp.spec.metrics_collector_spec = Some(MetricsCollectorSpec {
            collector: Some(CollectorSpec {
                kind: CollectorKind::StdOut,
            }),
            source: None,
        });
        exp.spec.objective = Some(ObjectiveSpec {
            objective_type: ObjectiveType::Maximize,
            goal: Some(0.11),
            objective_metric_name: "testme".to_string(),
            additional_metric_names: vec![],
        });
        exp.spec.algorithm = Some(AlgorithmSpec {
            algorithm_name: "test".to_string(),
            algorithm_settings: vec![AlgorithmSetting {
                name: "test1".to_string(),
                value: "value1".to_string(),
            }],
        });
        exp.spec.parameters = vec![ParameterSpec {
            name: "test".to_string(),
            parameter_type: ParameterType::Categorical,
            feasible_space: FeasibleSpace {
                list: vec!["1".to_string(), "2".to_string()],
                ..Default::default()
            },
        }];
        exp
    }

    fn validator() -> ExperimentValidator {
        ExperimentValidator::new(Arc::new(FakeGenerator::new(JOB)), ValidatorConfig::default())
    }

    #[test]
    fn fake_instance_is_valid() {
        let v = validator();
        assert!(v.validate(&fake_instance(), None).is_ok());
        assert!(v.validate(&fake_instance(), Some(&fake_instance())).is_ok());
    }

    type Edit = fn(&mut Experiment);
    type Check = fn(&ValidationError) -> bool;

    fn case(name: &'static str, edit: Edit, want: Check) -> (&'static str, Edit, Check) {
        (name, edit, want)
    }

    #[test]
    fn rule_table() {
        let cases = [
            case(
                "nil objective",
                |e| e.spec.objective = None,
                |err| matches!(err, ValidationError::InvalidObjective { .. }),
            ),
            case(
                "unknown objective type",
                |e| e.spec.objective.as_mut().unwrap().objective_type = ObjectiveType::Unknown,
                |err| matches!(err, ValidationError::InvalidObjective { .. }),
            ),
            case(
                "empty objective metric",
                |e| e.spec.objective.as_mut().unwrap().objective_metric_name.clear(),
                |err| matches!(err, ValidationError::InvalidObjective { .. }),
            ),
            case(
                "nil algorithm",
                |e| e.spec.algorithm = None,
                |err| matches!(err, ValidationError::InvalidAlgorithm(_)),
            ),
            case(
                "empty algorithm name",
                |e| e.spec.algorithm.as_mut().unwrap().algorithm_name.clear(),
                |err| matches!(err, ValidationError::InvalidAlgorithm(_)),
            ),
            case(
                "negative maxFailedTrialCount",
                |e| e.spec.max_failed_trial_count = Some(-1),
                |err| matches!(err, ValidationError::InvalidCount { .. }),
            ),
            case(
                "negative maxTrialCount",
                |e| e.spec.max_trial_count = Some(-1),
                |err| matches!(err, ValidationError::InvalidCount { .. }),
            ),
            case(
                "negative parallelTrialCount",
                |e| e.spec.parallel_trial_count = Some(-1),
                |err| matches!(err, ValidationError::InvalidCount { .. }),
            ),
            case(
                "empty search space",
                |e| {
                    e.spec.parameters.clear();
                    e.spec.nas_config = None;
                },
                |err| matches!(err, ValidationError::EmptySearchSpace),
            ),
            case(
                "nas operation without parameters",
                |e| {
                    e.spec.nas_config = Some(NasConfig {
                        graph_config: None,
                        operations: vec![Operation {
                            operation_type: "op1".to_string(),
                            parameters: vec![],
                        }],
                    })
                },
                |err| matches!(err, ValidationError::InvalidNasOperation { .. }),
            ),
        ];

        let v = validator();
        for (name, edit, want) in cases {
            let mut exp = fake_instance();
            edit(&mut exp);
            match v.validate(&exp, None) {
                Err(err) => assert!(want(&err), "{}: unexpected error {:?}", name, err),
                Ok(()) => panic!("{}: expected an error", name),
            }
        }
    }

    #[test]
    fn update_rejects_frozen_changes() {
        let v = validator();

        let mut prior = fake_instance();
        prior.spec.algorithm.as_mut().unwrap().algorithm_name = "not-test".to_string();
        let err = v.validate(&fake_instance(), Some(&prior)).unwrap_err();
        assert!(matches!(err, ValidationError::ImmutableFieldChanged { .. }), "{err}");

        let mut prior = fake_instance();
        prior.spec.resume_policy = Some(ResumePolicy::FromVolume);
        let err = v.validate(&fake_instance(), Some(&prior)).unwrap_err();
        assert!(matches!(err, ValidationError::ImmutableFieldChanged { .. }), "{err}");

        // Mutable fields may change.
        let mut proposed = fake_instance();
        proposed.spec.max_trial_count = Some(20);
        proposed.spec.parallel_trial_count = Some(4);
        assert!(v.validate(&proposed, Some(&fake_instance())).is_ok());
    }

    #[test]
    fn frozen_fields_are_configurable() {
        let config = ValidatorConfig {
            frozen_fields: vec![FrozenField::ObjectiveMetricName],
            ..Default::default()
        };
        let v = ExperimentValidator::new(Arc::new(FakeGenerator::new(JOB)), config);

        let mut prior = fake_instance();
        prior.spec.algorithm.as_mut().unwrap().algorithm_name = "not-test".to_string();
        assert!(v.validate(&fake_instance(), Some(&prior)).is_ok());

        let mut prior = fake_instance();
        prior.spec.objective.as_mut().unwrap().objective_metric_name = "loss".to_string();
        assert!(v.validate(&fake_instance(), Some(&prior)).is_err());
    }

    #[test]
    fn first_failure_wins() {
        let generator = Arc::new(FakeGenerator::new(JOB));
        let v = ExperimentValidator::new(generator.clone(), ValidatorConfig::default());

        let mut exp = fake_instance();
        exp.spec.objective = None;
        exp.spec.parameters.clear();
        let err = v.validate(&exp, None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidObjective { .. }));
        assert_eq!(generator.render_calls(), 0);

        assert!(v.validate(&fake_instance(), None).is_ok());
        assert_eq!(generator.render_calls(), 1);
    }

    #[test]
    fn repeated_calls_agree() {
        let v = validator();
        let mut exp = fake_instance();
        exp.spec.max_trial_count = Some(-3);
        let first = v.validate(&exp, None).unwrap_err().to_string();
        let second = v.validate(&exp, None).unwrap_err().to_string();
        assert_eq!(first, second);
    }
}
