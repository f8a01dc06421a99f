//! Trial template rules: render the run spec once and check its header.

use crate::manifest::{CollaboratorCall, ManifestGenerator, expected_trial_name};
use crate::spec::Experiment;
use crate::validate::{ValidationError, ValidationResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A job-like workload a trial may run as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadKind {
    pub api_version: String,
    pub kind: String,
}

impl WorkloadKind {
    pub fn new(api_version: &str, kind: &str) -> Self {
        Self {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn defaults() -> Vec<WorkloadKind> {
        vec![
            WorkloadKind::new("batch/v1", "Job"),
            WorkloadKind::new("kubeflow.org/v1", "TFJob"),
            WorkloadKind::new("kubeflow.org/v1", "PyTorchJob"),
        ]
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version, self.kind)
    }
}

/// Header fields of the rendered manifest; the body is opaque here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkloadHeader {
    #[serde(default)]
    api_version: String,

    #[serde(default)]
    kind: String,

    #[serde(default)]
    metadata: WorkloadMeta,
}

#[derive(Debug, Default, Deserialize)]
struct WorkloadMeta {
    #[serde(default)]
    name: String,

    #[serde(default)]
    namespace: String,
}

pub fn validate_trial_template(
    experiment: &Experiment,
    generator: &dyn ManifestGenerator,
    supported: &[WorkloadKind],
) -> ValidationResult<()> {
    let text = generator
        .render_run_spec(experiment)
        .map_err(ValidationError::collaborator(CollaboratorCall::RenderRunSpec))?;

    // 1) Syntax and field types.
    let header: WorkloadHeader = serde_yaml::from_str(&text)
        .map_err(|e| ValidationError::InvalidManifestSyntax(e.to_string()))?;

    // 2) Workload kind.
    if !supported
        .iter()
        .any(|w| w.api_version == header.api_version && w.kind == header.kind)
    {
        return Err(ValidationError::UnsupportedWorkloadKind {
            api_version: header.api_version,
            kind: header.kind,
        });
    }

    // 3) Namespace.
    if header.metadata.namespace != experiment.namespace() {
        return Err(ValidationError::NamespaceMismatch {
            expected: experiment.namespace().to_string(),
            actual: header.metadata.namespace,
        });
    }

    // 4) Name.
    let expected = expected_trial_name(experiment);
    if header.metadata.name != expected {
        return Err(ValidationError::NameMismatch {
            expected,
            actual: header.metadata.name,
        });
    }

    debug!(
        "trial template renders {}/{} {}/{}",
        header.api_version, header.kind, header.metadata.namespace, header.metadata.name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FakeGenerator;

    const JOB: &str = r#"apiVersion: batch/v1
kind: Job
metadata:
  name: fake-trial
  namespace: fakens
spec:
  template:
    spec:
      containers:
      - name: fake-trial
        image: test-image"#;

    fn experiment() -> Experiment {
        let mut exp = Experiment::default();
        exp.metadata.name = "fake".to_string();
        exp.metadata.namespace = "fakens".to_string();
        exp
    }

    fn check(manifest: &str) -> ValidationResult<()> {
        validate_trial_template(
            &experiment(),
            &FakeGenerator::new(manifest),
            &WorkloadKind::defaults(),
        )
    }

    #[test]
    fn valid_job() {
        assert!(check(JOB).is_ok());
    }

    #[test]
    fn broken_yaml() {
        let err = check(&JOB.replace("- name", "- * -")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidManifestSyntax(_)), "{err}");

        let err = check("kind: Job\nmetadata: 42").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidManifestSyntax(_)), "{err}");
    }

    #[test]
    fn wrong_kind() {
        let err = check(&JOB.replace("Job", "NewJobType")).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedWorkloadKind { .. }), "{err}");

        let err = check(&JOB.replace("batch/v1", "batch/v2")).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedWorkloadKind { .. }), "{err}");
    }

    #[test]
    fn wrong_namespace() {
        let err = check(&JOB.replace("fakens", "not-fakens")).unwrap_err();
        assert!(matches!(err, ValidationError::NamespaceMismatch { .. }), "{err}");
    }

    #[test]
    fn wrong_name() {
        let err = check(&JOB.replace("fake-trial", "new-name")).unwrap_err();
        assert!(matches!(err, ValidationError::NameMismatch { .. }), "{err}");
    }

    #[test]
    fn tfjob_without_namespace() {
        let tfjob = r#"apiVersion: "kubeflow.org/v1"
kind: "TFJob"
metadata:
    name: "dist-mnist-for-e2e-test""#;
        let err = check(tfjob).unwrap_err();
        assert!(matches!(err, ValidationError::NamespaceMismatch { .. }), "{err}");
    }

    #[test]
    fn render_failure_is_collaborator_failure() {
        let generator = FakeGenerator::new(JOB).fail_render("template engine down");
        let err = validate_trial_template(&experiment(), &generator, &WorkloadKind::defaults()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::CollaboratorFailure {
                call: CollaboratorCall::RenderRunSpec,
                ..
            }
        ));
    }
}
