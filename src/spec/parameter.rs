//! Search space: flat hyperparameters and the NAS operation list.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub parameter_type: ParameterType,

    #[serde(default)]
    pub feasible_space: FeasibleSpace,
}

impl ParameterSpec {
    /// Representative value used when a trial manifest is rendered for
    /// validation: the lower bound for numeric types, the first entry otherwise.
    pub fn sample_value(&self) -> Option<String> {
        match self.parameter_type {
            ParameterType::Double | ParameterType::Int => self.feasible_space.min.clone(),
            ParameterType::Categorical | ParameterType::Discrete => {
                self.feasible_space.list.first().cloned()
            }
            ParameterType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Double,
    Int,
    Categorical,
    Discrete,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Double => f.write_str("double"),
            ParameterType::Int => f.write_str("int"),
            ParameterType::Categorical => f.write_str("categorical"),
            ParameterType::Discrete => f.write_str("discrete"),
            ParameterType::Unknown => f.write_str("unknown"),
        }
    }
}

/// Bounds are kept as text, the way they travel on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibleSpace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NasConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_config: Option<serde_json::Value>,

    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_type: String,

    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_value_follows_type() {
        let lr: ParameterSpec = serde_yaml::from_str(
            r#"
name: lr
parameterType: double
feasibleSpace: { min: "0.01", max: "0.03" }
"#,
        )
        .unwrap();
        assert_eq!(lr.sample_value().as_deref(), Some("0.01"));

        let optimizer: ParameterSpec = serde_yaml::from_str(
            r#"
name: optimizer
parameterType: categorical
feasibleSpace: { list: [sgd, adam] }
"#,
        )
        .unwrap();
        assert_eq!(optimizer.sample_value().as_deref(), Some("sgd"));
    }

    #[test]
    fn nas_operations_decode() {
        let nas: NasConfig = serde_yaml::from_str(
            r#"
graphConfig: { numLayers: 8 }
operations:
  - operationType: separable_convolution
    parameters:
      - name: filter_size
        parameterType: categorical
        feasibleSpace: { list: ["3", "5"] }
  - operationType: skip_connection
"#,
        )
        .unwrap();
        assert_eq!(nas.operations.len(), 2);
        assert_eq!(nas.operations[0].parameters[0].parameter_type, ParameterType::Categorical);
        assert!(nas.operations[1].parameters.is_empty());
    }
}
