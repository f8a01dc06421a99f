//! Search space rules: something to search over, and each parameter's
//! feasible space consistent with its type.

use crate::spec::{ExperimentSpec, NasConfig, ParameterSpec, ParameterType};
use crate::validate::{ValidationError, ValidationResult};
use std::collections::BTreeSet;

pub fn validate_search_space(spec: &ExperimentSpec) -> ValidationResult<()> {
    match &spec.nas_config {
        None if spec.parameters.is_empty() => return Err(ValidationError::EmptySearchSpace),
        None => {}
        Some(nas) => validate_nas_config(nas)?,
    }

    let mut seen = BTreeSet::new();
    for p in &spec.parameters {
        validate_parameter(p)?;
        if !seen.insert(p.name.as_str()) {
            return Err(invalid(p, "duplicate parameter name"));
        }
    }
    Ok(())
}

pub fn validate_nas_config(nas: &NasConfig) -> ValidationResult<()> {
    for op in &nas.operations {
        if op.parameters.is_empty() {
            return Err(ValidationError::InvalidNasOperation {
                operation_type: op.operation_type.clone(),
            });
        }
        for p in &op.parameters {
            validate_parameter(p)?;
        }
    }
    Ok(())
}

pub fn validate_parameter(p: &ParameterSpec) -> ValidationResult<()> {
    if p.name.is_empty() {
        return Err(invalid(p, "name must not be empty"));
    }

    let space = &p.feasible_space;
    match p.parameter_type {
        ParameterType::Int => {
            let (min, max) = bounds(p, |s| s.parse::<i64>().ok())?;
            if min > max {
                return Err(invalid(p, format!("min {} is greater than max {}", min, max)));
            }
            validate_step(p)?;
        }
        ParameterType::Double => {
            let (min, max) = bounds(p, |s| s.parse::<f64>().ok().filter(|v| v.is_finite()))?;
            if min > max {
                return Err(invalid(p, format!("min {} is greater than max {}", min, max)));
            }
            validate_step(p)?;
        }
        ParameterType::Categorical => {
            if space.list.is_empty() {
                return Err(invalid(p, "feasibleSpace.list must not be empty"));
            }
        }
        ParameterType::Discrete => {
            if space.list.is_empty() {
                return Err(invalid(p, "feasibleSpace.list must not be empty"));
            }
            if let Some(bad) = space.list.iter().find(|v| v.parse::<f64>().is_err()) {
                return Err(invalid(p, format!("discrete value {:?} is not a number", bad)));
            }
        }
        ParameterType::Unknown => {
            return Err(invalid(
                p,
                "parameterType must be one of double, int, categorical, discrete",
            ));
        }
    }
    Ok(())
}

fn bounds<T>(p: &ParameterSpec, parse: impl Fn(&str) -> Option<T>) -> ValidationResult<(T, T)> {
    let one = |field: &str, value: Option<&String>| match value {
        None => Err(invalid(
            p,
            format!("feasibleSpace.{} is required for {} parameters", field, p.parameter_type),
        )),
        Some(v) => parse(v).ok_or_else(|| {
            invalid(
                p,
                format!("feasibleSpace.{} {:?} is not a valid {}", field, v, p.parameter_type),
            )
        }),
    };
    let min = one("min", p.feasible_space.min.as_ref())?;
    let max = one("max", p.feasible_space.max.as_ref())?;
    Ok((min, max))
}

fn validate_step(p: &ParameterSpec) -> ValidationResult<()> {
    let Some(step) = &p.feasible_space.step else {
        return Ok(());
    };
    match step.parse::<f64>() {
        Ok(v) if v > 0.0 && v.is_finite() => Ok(()),
        _ => Err(invalid(
            p,
            format!("feasibleSpace.step {:?} must be a positive number", step),
        )),
    }
}

fn invalid(p: &ParameterSpec, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidParameter {
        name: p.name.clone(),
        reason: reason.into(),
    }
}
