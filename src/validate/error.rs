use crate::manifest::{CollaboratorCall, GenerationError};
use crate::validate::FrozenField;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reason an Experiment is denied. The `Display` text is what the end user
/// sees in the rejected create/update request.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid objective: {field} {reason}")]
    InvalidObjective { field: &'static str, reason: String },

    #[error("invalid algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("invalid {field}: {value} (expected >= 0)")]
    InvalidCount { field: &'static str, value: i32 },

    #[error("spec.parameters or spec.nasConfig must be specified")]
    EmptySearchSpace,

    #[error("invalid parameter {name:?}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("nasConfig operation {operation_type:?} must have at least one parameter")]
    InvalidNasOperation { operation_type: String },

    #[error("unknown metrics collector kind: {0:?}")]
    UnknownCollectorKind(String),

    #[error("invalid path for {field}: {path:?} ({reason})")]
    InvalidPath {
        field: &'static str,
        path: String,
        reason: String,
    },

    #[error("invalid port for metrics collector: {0}")]
    InvalidPort(String),

    #[error("invalid metrics format {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("metrics format {pattern:?} must contain exactly one capture group, found {count}")]
    InvalidRegexCaptureCount { pattern: String, count: usize },

    #[error("custom collector kind requires source.customCollector with a container name")]
    MissingCustomCollector,

    #[error("{field} is immutable: cannot change from {old:?} to {new:?}")]
    ImmutableFieldChanged {
        field: FrozenField,
        old: String,
        new: String,
    },

    #[error("invalid trial manifest: {0}")]
    InvalidManifestSyntax(String),

    #[error("unsupported trial workload {api_version}/{kind}")]
    UnsupportedWorkloadKind { api_version: String, kind: String },

    #[error("trial manifest namespace {actual:?} does not match experiment namespace {expected:?}")]
    NamespaceMismatch { expected: String, actual: String },

    #[error("trial manifest name {actual:?} does not match expected trial name {expected:?}")]
    NameMismatch { expected: String, actual: String },

    #[error("manifest generator call failed ({call}): {source}")]
    CollaboratorFailure {
        call: CollaboratorCall,
        #[source]
        source: GenerationError,
    },
}

impl ValidationError {
    pub(crate) fn collaborator(call: CollaboratorCall) -> impl FnOnce(GenerationError) -> Self {
        move |source| ValidationError::CollaboratorFailure { call, source }
    }
}
