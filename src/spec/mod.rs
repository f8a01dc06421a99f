//! Spec layer: serde schemas for the Experiment resource.
//!
//! This module only describes shapes. Rules live in `validate`.

pub mod collector;
pub mod experiment;
pub mod objective;
pub mod parameter;
pub mod template;

pub use collector::{
    CollectorKind, CollectorSpec, Container, FileSystemKind, FileSystemPath, FilterSpec,
    HttpGetAction, MetricsCollectorSpec, PortValue, SourceSpec,
};
pub use experiment::{Experiment, ExperimentSpec, ObjectMeta, ResumePolicy};
pub use objective::{AlgorithmSetting, AlgorithmSpec, ObjectiveSpec, ObjectiveType};
pub use parameter::{FeasibleSpace, NasConfig, Operation, ParameterSpec, ParameterType};
pub use template::{ConfigMapSource, TrialParameterSpec, TrialTemplate};
