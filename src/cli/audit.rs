//! Audit command handler.
//!
//! Implements the `audit` subcommand: one fresh run, saved as a snapshot.

use super::finish;
use crate::grading::{grade_score, site_health_score};
use crate::pagespeed::AuditService;
use crate::pipeline::{run_audit_pipeline, snapshot_json, write_output, AuditRequest, OutputTarget};
use crate::planner::AiPlanner;
use anyhow::Result;
use chrono::Utc;

/// Run the audit command
pub fn run_audit(
    service: &dyn AuditService,
    planner: &AiPlanner,
    request: &AuditRequest,
    output: &OutputTarget,
) -> Result<i32> {
    finish(audit_and_write(service, planner, request, output))
}

fn audit_and_write(
    service: &dyn AuditService,
    planner: &AiPlanner,
    request: &AuditRequest,
    output: &OutputTarget,
) -> std::result::Result<(), crate::pipeline::PipelineError> {
    let outcome = run_audit_pipeline(service, planner, request, Utc::now())?;
    let metrics = &outcome.snapshot.metrics;
    let health = site_health_score(
        metrics.perf_score,
        metrics.seo_score,
        metrics.accessibility_score,
    );
    tracing::info!(
        "Site health for {}: {} ({}), plan: {}",
        outcome.url,
        health,
        grade_score(f64::from(health)).label(),
        if outcome.snapshot.ai_action_plan.is_some() {
            "AI"
        } else {
            "built-in rules"
        }
    );

    write_output(&snapshot_json(&outcome.snapshot)?, output, false)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditServiceError;
    use crate::model::{NormalizedAuditMetrics, PlanTier, Strategy};
    use crate::pipeline::read_snapshot;
    use tempfile::TempDir;

    struct FixedService(Result<NormalizedAuditMetrics, AuditServiceError>);

    impl AuditService for FixedService {
        fn run_audit(
            &self,
            _url: &str,
            _strategy: Strategy,
        ) -> Result<NormalizedAuditMetrics, AuditServiceError> {
            self.0.clone()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_snapshot_written() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        let service = FixedService(Ok(NormalizedAuditMetrics {
            perf_score: 55,
            seo_score: Some(80),
            ..NormalizedAuditMetrics::default()
        }));
        let request = AuditRequest::new("example.com", Strategy::Mobile, PlanTier::Free);

        let code = run_audit(
            &service,
            &AiPlanner::disabled(),
            &request,
            &OutputTarget::File(path.clone()),
        )
        .unwrap();
        assert_eq!(code, 0);
        let snapshot = read_snapshot(&path).unwrap();
        assert_eq!(snapshot.metrics.perf_score, 55);
        assert!(snapshot.ai_action_plan.is_none());
    }

    #[test]
    fn test_service_failure_exit_code() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.json");
        let service = FixedService(Err(AuditServiceError::from_status(500, None)));
        let request = AuditRequest::new("example.com", Strategy::Mobile, PlanTier::Free);

        let code = run_audit(
            &service,
            &AiPlanner::disabled(),
            &request,
            &OutputTarget::File(path.clone()),
        )
        .unwrap();
        assert_eq!(code, 1);
        assert!(!path.exists());
    }
}
