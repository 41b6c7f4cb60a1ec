//! JSON files standing in for the persistence layer.

use crate::error::{ErrorContext, PerfAllyError, Result};
use crate::model::{AuditSnapshot, ProjectReport};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load a stored audit snapshot.
pub fn read_snapshot(path: &Path) -> Result<AuditSnapshot> {
    read_json(path).context("reading audit snapshot")
}

/// Load a project file: project, pages with their latest audits, and an
/// optional branding record.
pub fn read_project(path: &Path) -> Result<ProjectReport> {
    let report: ProjectReport = read_json(path).context("reading project")?;
    tracing::debug!(
        "Loaded project '{}' with {} pages from {}",
        report.project.name,
        report.pages.len(),
        path.display()
    );
    Ok(report)
}

/// Pretty JSON for a snapshot, newline-terminated.
pub fn snapshot_json(snapshot: &AuditSnapshot) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(snapshot).map_err(|e| {
        PerfAllyError::report(
            "encoding audit snapshot",
            crate::error::ReportErrorKind::JsonSerializationError(e.to_string()),
        )
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| PerfAllyError::io(path, e))?;
    serde_json::from_str(&content).with_context(|| format!("decoding {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NormalizedAuditMetrics;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn snapshot() -> AuditSnapshot {
        AuditSnapshot {
            metrics: NormalizedAuditMetrics {
                perf_score: 88,
                seo_score: Some(97),
                cls: Some(0.04),
                tool_version: "12.1.0".to_string(),
                ..NormalizedAuditMetrics::default()
            },
            audited_at: Utc.with_ymd_and_hms(2026, 2, 10, 15, 30, 0).unwrap(),
            ai_action_plan: None,
        }
    }

    #[test]
    fn test_snapshot_file_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        std::fs::write(&path, snapshot_json(&snapshot()).unwrap()).unwrap();

        assert_eq!(read_snapshot(&path).unwrap(), snapshot());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_snapshot(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, PerfAllyError::Io { .. }));
        assert!(err.to_string().contains("reading audit snapshot"));
    }

    #[test]
    fn test_malformed_project_is_payload_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("project.json");
        std::fs::write(&path, r#"{"project": {"name": "x"}}"#).unwrap();

        let err = read_project(&path).unwrap_err();
        assert!(matches!(err, PerfAllyError::Payload { .. }));
        assert!(err.to_string().starts_with("Failed to read audit payload: reading project: decoding"));
    }
}
