//! Metrics collector rules, dispatched on collector kind.

use crate::manifest::{CollaboratorCall, ManifestGenerator};
use crate::spec::{CollectorKind, FileSystemKind, MetricsCollectorSpec, SourceSpec};
use crate::validate::rules::{compile_metrics_format, is_absolute_path, is_valid_url_path, port_number};
use crate::validate::{ValidationError, ValidationResult};
use log::debug;

pub fn validate_metrics_collector(
    spec: Option<&MetricsCollectorSpec>,
    generator: &dyn ManifestGenerator,
) -> ValidationResult<()> {
    let Some(spec) = spec else {
        // Defaulted to StdOut by the cluster.
        return collector_image(&CollectorKind::StdOut, generator);
    };
    let kind = spec.kind();
    let source = spec.source.as_ref();

    match &kind {
        CollectorKind::StdOut => {}
        CollectorKind::File => validate_file_source(source, FileSystemKind::File)?,
        CollectorKind::TfEvent => validate_file_source(source, FileSystemKind::Directory)?,
        CollectorKind::PrometheusMetric => validate_http_source(source)?,
        CollectorKind::Custom => validate_custom_source(source)?,
        CollectorKind::Unrecognized(tag) => {
            return Err(ValidationError::UnknownCollectorKind(tag.clone()));
        }
    }

    if let Some(filter) = source.and_then(|s| s.filter.as_ref()) {
        for pattern in &filter.metrics_format {
            compile_metrics_format(pattern)?;
        }
        debug!("{} metrics format pattern(s) accepted", filter.metrics_format.len());
    }

    match kind {
        // Custom collectors bring their own image.
        CollectorKind::Custom => Ok(()),
        other => collector_image(&other, generator),
    }
}

fn collector_image(kind: &CollectorKind, generator: &dyn ManifestGenerator) -> ValidationResult<()> {
    let image = generator
        .metrics_collector_image(kind)
        .map_err(ValidationError::collaborator(CollaboratorCall::MetricsCollectorImage))?;
    debug!("metrics collector {} uses image {}", kind, image);
    Ok(())
}

fn validate_file_source(source: Option<&SourceSpec>, want: FileSystemKind) -> ValidationResult<()> {
    let Some(fsp) = source.and_then(|s| s.file_system_path.as_ref()) else {
        return Err(ValidationError::InvalidPath {
            field: "source.fileSystemPath",
            path: String::new(),
            reason: "must be specified".to_string(),
        });
    };

    if !is_absolute_path(&fsp.path) {
        return Err(ValidationError::InvalidPath {
            field: "source.fileSystemPath.path",
            path: fsp.path.clone(),
            reason: "must be absolute".to_string(),
        });
    }

    if let Some(kind) = fsp.kind {
        if kind != want {
            return Err(ValidationError::InvalidPath {
                field: "source.fileSystemPath.kind",
                path: fsp.path.clone(),
                reason: format!("expected {} but got {}", want, kind),
            });
        }
    }
    Ok(())
}

fn validate_http_source(source: Option<&SourceSpec>) -> ValidationResult<()> {
    let Some(http) = source.and_then(|s| s.http_get.as_ref()) else {
        return Err(ValidationError::InvalidPort(
            "source.httpGet must be specified".to_string(),
        ));
    };

    if port_number(&http.port).is_none() {
        return Err(ValidationError::InvalidPort(format!(
            "{} is not a port number in 1..=65535",
            http.port
        )));
    }

    if let Some(path) = http.path.as_deref().filter(|p| !p.is_empty()) {
        if !is_valid_url_path(path) {
            return Err(ValidationError::InvalidPath {
                field: "source.httpGet.path",
                path: path.to_string(),
                reason: "must be a URL path starting with /".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_custom_source(source: Option<&SourceSpec>) -> ValidationResult<()> {
    let container = source.and_then(|s| s.custom_collector.as_ref());
    if container.is_none_or(|c| c.name.is_empty()) {
        return Err(ValidationError::MissingCustomCollector);
    }

    if let Some(fsp) = source.and_then(|s| s.file_system_path.as_ref()) {
        if !is_absolute_path(&fsp.path) {
            return Err(ValidationError::InvalidPath {
                field: "source.fileSystemPath.path",
                path: fsp.path.clone(),
                reason: "must be absolute".to_string(),
            });
        }
    }
    Ok(())
}
