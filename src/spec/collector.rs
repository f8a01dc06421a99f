//! Metrics collector strategy.
//!
//! `collector.kind` selects which members of `source` are meaningful:
//! - StdOut: none
//! - File / TfEvent: fileSystemPath
//! - PrometheusMetric: httpGet
//! - Custom: customCollector (fileSystemPath optional)
//! filter.metricsFormat applies to every kind.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsCollectorSpec {
    #[serde(default)]
    pub collector: Option<CollectorSpec>,

    #[serde(default)]
    pub source: Option<SourceSpec>,
}

impl MetricsCollectorSpec {
    /// Collector kind with the StdOut default applied.
    pub fn kind(&self) -> CollectorKind {
        self.collector
            .as_ref()
            .map(|c| c.kind.clone())
            .unwrap_or(CollectorKind::StdOut)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectorSpec {
    #[serde(default)]
    pub kind: CollectorKind,
}

/// Closed set of collector strategies. Any other tag survives decoding as
/// `Unrecognized` so that it can be rejected with its original text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CollectorKind {
    #[default]
    StdOut,
    File,
    TfEvent,
    PrometheusMetric,
    Custom,
    Unrecognized(String),
}

impl From<String> for CollectorKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "StdOut" => CollectorKind::StdOut,
            "File" => CollectorKind::File,
            "TfEvent" => CollectorKind::TfEvent,
            "PrometheusMetric" | "Prometheus" => CollectorKind::PrometheusMetric,
            "Custom" => CollectorKind::Custom,
            _ => CollectorKind::Unrecognized(s),
        }
    }
}

impl From<CollectorKind> for String {
    fn from(kind: CollectorKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorKind::StdOut => f.write_str("StdOut"),
            CollectorKind::File => f.write_str("File"),
            CollectorKind::TfEvent => f.write_str("TfEvent"),
            CollectorKind::PrometheusMetric => f.write_str("PrometheusMetric"),
            CollectorKind::Custom => f.write_str("Custom"),
            CollectorKind::Unrecognized(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    #[serde(default)]
    pub file_system_path: Option<FileSystemPath>,

    #[serde(default)]
    pub http_get: Option<HttpGetAction>,

    #[serde(default)]
    pub filter: Option<FilterSpec>,

    #[serde(default)]
    pub custom_collector: Option<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSystemPath {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub kind: Option<FileSystemKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileSystemKind {
    File,
    Directory,
}

impl fmt::Display for FileSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemKind::File => f.write_str("File"),
            FileSystemKind::Directory => f.write_str("Directory"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpGetAction {
    #[serde(default)]
    pub port: PortValue,

    #[serde(default)]
    pub path: Option<String>,
}

/// Port as it appears in a pod spec: a number or a named port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Int(i64),
    Str(String),
}

impl Default for PortValue {
    fn default() -> Self {
        PortValue::Int(0)
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortValue::Int(n) => write!(f, "{}", n),
            PortValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default)]
    pub metrics_format: Vec<String>,
}

/// The subset of a container definition the collector needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_tags_decode() {
        let cases = [
            ("StdOut", CollectorKind::StdOut),
            ("File", CollectorKind::File),
            ("TfEvent", CollectorKind::TfEvent),
            ("PrometheusMetric", CollectorKind::PrometheusMetric),
            ("Prometheus", CollectorKind::PrometheusMetric),
            ("Custom", CollectorKind::Custom),
            ("invalid-kind", CollectorKind::Unrecognized("invalid-kind".to_string())),
        ];
        for (tag, want) in cases {
            let spec: CollectorSpec = serde_json::from_str(&format!(r#"{{"kind":"{}"}}"#, tag)).unwrap();
            assert_eq!(spec.kind, want, "tag {}", tag);
        }
    }

    #[test]
    fn absent_collector_means_stdout() {
        assert_eq!(MetricsCollectorSpec::default().kind(), CollectorKind::StdOut);
    }

    #[test]
    fn port_accepts_number_or_name() {
        let http: HttpGetAction = serde_json::from_str(r#"{"port":8080,"path":"/metrics"}"#).unwrap();
        assert_eq!(http.port, PortValue::Int(8080));

        let http: HttpGetAction = serde_json::from_str(r#"{"port":"Port"}"#).unwrap();
        assert_eq!(http.port, PortValue::Str("Port".to_string()));
        assert_eq!(http.path, None);
    }

    #[test]
    fn source_members_decode() {
        let yaml = r#"
collector:
  kind: File
source:
  fileSystemPath:
    path: /var/log/katib/metrics.log
    kind: File
  filter:
    metricsFormat:
      - "([\\w|-]+)\\s*=\\s*((-?\\d+)(\\.\\d+)?)"
"#;
        let spec: MetricsCollectorSpec = serde_yaml::from_str(yaml).unwrap();
        let source = spec.source.unwrap();
        let fsp = source.file_system_path.unwrap();
        assert_eq!(fsp.path, "/var/log/katib/metrics.log");
        assert_eq!(fsp.kind, Some(FileSystemKind::File));
        assert_eq!(source.filter.unwrap().metrics_format.len(), 1);
    }
}
