//! Admission host: the `AdmissionReview` envelope around the validator.
//!
//! JSON shape (admission.k8s.io/v1):
//! {
//!   "apiVersion": "admission.k8s.io/v1",
//!   "kind": "AdmissionReview",
//!   "request": {
//!     "uid": "...",
//!     "operation": "CREATE" | "UPDATE" | "DELETE" | "CONNECT",
//!     "namespace": "kubeflow",
//!     "object": { ...Experiment... },
//!     "oldObject": { ...Experiment... }      // UPDATE only
//!   }
//! }
//!
//! The reply is the same envelope with `response` filled in and `request`
//! dropped.

use crate::spec::Experiment;
use crate::validate::ExperimentValidator;
use log::{info, warn};
use serde::{Deserialize, Serialize};

const REVIEW_API_VERSION: &str = "admission.k8s.io/v1";
const DENIED_CODE: u16 = 403;
const BAD_REQUEST_CODE: u16 = 400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReview {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AdmissionResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    #[serde(default)]
    pub uid: String,

    pub operation: AdmissionOperation,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub object: Option<serde_json::Value>,

    #[serde(default)]
    pub old_object: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdmissionOperation {
    Create,
    Update,
    Delete,
    Connect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    pub uid: String,

    pub allowed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub code: u16,
    pub message: String,
}

/// Outcome handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub message: String,
}

impl Decision {
    fn allow() -> Self {
        Self {
            allowed: true,
            message: String::new(),
        }
    }

    fn deny(message: String) -> Self {
        Self {
            allowed: false,
            message,
        }
    }
}

pub fn decide(validator: &ExperimentValidator, proposed: &Experiment, prior: Option<&Experiment>) -> Decision {
    match validator.validate(proposed, prior) {
        Ok(()) => {
            info!("admitted experiment {}/{}", proposed.namespace(), proposed.name());
            Decision::allow()
        }
        Err(e) => {
            info!(
                "denied experiment {}/{}: {}",
                proposed.namespace(),
                proposed.name(),
                e
            );
            Decision::deny(e.to_string())
        }
    }
}

/// Answer one review. Never fails: undecodable input is denied.
pub fn review(validator: &ExperimentValidator, review: AdmissionReview) -> AdmissionReview {
    let response = match review.request {
        Some(request) => respond(validator, request),
        None => {
            warn!("admission review without request");
            AdmissionResponse {
                uid: String::new(),
                allowed: false,
                status: Some(ResponseStatus {
                    code: BAD_REQUEST_CODE,
                    message: "admission review has no request".to_string(),
                }),
            }
        }
    };

    AdmissionReview {
        api_version: if review.api_version.is_empty() {
            REVIEW_API_VERSION.to_string()
        } else {
            review.api_version
        },
        kind: "AdmissionReview".to_string(),
        request: None,
        response: Some(response),
    }
}

fn respond(validator: &ExperimentValidator, request: AdmissionRequest) -> AdmissionResponse {
    let uid = request.uid.clone();
    match request.operation {
        AdmissionOperation::Delete | AdmissionOperation::Connect => {
            return AdmissionResponse {
                uid,
                allowed: true,
                status: None,
            };
        }
        AdmissionOperation::Create | AdmissionOperation::Update => {}
    }

    let bad_request = |message: String| AdmissionResponse {
        uid: uid.clone(),
        allowed: false,
        status: Some(ResponseStatus {
            code: BAD_REQUEST_CODE,
            message,
        }),
    };

    let namespace = request.namespace.as_deref();
    let proposed = match decode(request.object, namespace, "object") {
        Ok(exp) => exp,
        Err(message) => return bad_request(message),
    };
    let prior = match (request.operation, request.old_object) {
        (AdmissionOperation::Update, Some(old)) => match decode(Some(old), namespace, "oldObject") {
            Ok(exp) => Some(exp),
            Err(message) => return bad_request(message),
        },
        _ => None,
    };

    let decision = decide(validator, &proposed, prior.as_ref());
    AdmissionResponse {
        uid,
        allowed: decision.allowed,
        status: (!decision.allowed).then(|| ResponseStatus {
            code: DENIED_CODE,
            message: decision.message,
        }),
    }
}

/// Decode an Experiment, taking the request namespace when the object omits
/// its own.
fn decode(
    value: Option<serde_json::Value>,
    namespace: Option<&str>,
    field: &str,
) -> Result<Experiment, String> {
    let value = value.ok_or_else(|| format!("request.{} is missing", field))?;
    let mut exp: Experiment = serde_json::from_value(value)
        .map_err(|e| format!("cannot decode request.{} as Experiment: {}", field, e))?;
    if exp.metadata.namespace.is_empty() {
        if let Some(ns) = namespace {
            exp.metadata.namespace = ns.to_string();
        }
    }
    Ok(exp)
}
