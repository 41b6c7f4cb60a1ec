//! Pipeline integration tests.
//!
//! These tests exercise the audit stage end to end: the scoring client
//! against a local HTTP server, normalization of a recorded response, plan
//! selection with and without a model client, and the report stage on a
//! stored project.

use chrono::{TimeZone, Utc};
use perfally::config::ReportConfig;
use perfally::error::AuditServiceError;
use perfally::model::{Impact, NormalizedAuditMetrics, PlanTier, Strategy};
use perfally::pagespeed::{normalize_response, AuditService, PageSpeedClient, PageSpeedConfig, PsiResponse};
use perfally::pipeline::{
    read_project, render_project_report, run_audit_pipeline, AuditRequest, PipelineError,
    ReportRequest,
};
use perfally::planner::ai::{AiPlanFailure, MessageRequest, MessageResponse};
use perfally::planner::{resolve_plan, AiPlanner, MessageClient, ModelTiers, PlanSource};
use perfally::reports::ReportFormat;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should exist")
}

fn recorded_metrics() -> NormalizedAuditMetrics {
    let response: PsiResponse =
        serde_json::from_str(&fixture("psi_response.json")).expect("fixture should decode");
    normalize_response(response).expect("fixture should normalize")
}

/// Serves recorded metrics and counts calls.
struct RecordedService {
    result: Result<NormalizedAuditMetrics, AuditServiceError>,
    calls: AtomicUsize,
}

impl RecordedService {
    fn new(result: Result<NormalizedAuditMetrics, AuditServiceError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }
}

impl AuditService for RecordedService {
    fn run_audit(
        &self,
        _url: &str,
        _strategy: Strategy,
    ) -> Result<NormalizedAuditMetrics, AuditServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "recorded"
    }
}

/// Answers every model request with the same text and records the models used.
struct ScriptedModel {
    reply: String,
    models: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            models: Mutex::new(Vec::new()),
        })
    }
}

impl MessageClient for ScriptedModel {
    fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, AiPlanFailure> {
        self.models.lock().unwrap().push(request.model.clone());
        Ok(MessageResponse::text(self.reply.clone()))
    }
}

fn planner_with(model: &Arc<ScriptedModel>) -> AiPlanner {
    AiPlanner::new(
        Some(Arc::clone(model) as Arc<dyn MessageClient>),
        ModelTiers::default(),
        1024,
    )
}

const MODEL_REPLY: &str = r#"Sure, here is the plan:
[
  {
    "title": "Inline critical CSS",
    "action": "Inline above-the-fold CSS and defer styles.css.",
    "steps": ["Extract critical CSS", "Load styles.css asynchronously"],
    "why": "styles.css blocks first paint.",
    "difficulty": "medium"
  }
]"#;

/// Serve one canned HTTP response and hand back the request line.
fn serve_once(status: &str, body: String) -> (String, std::thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let status = status.to_string();
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
        request_line
    });
    (format!("http://{addr}/pagespeedonline/v5/runPagespeed"), handle)
}

fn client_for(endpoint: String) -> PageSpeedClient {
    PageSpeedClient::new(PageSpeedConfig {
        endpoint,
        api_key: Some("test-key".to_string()),
        timeout: Duration::from_secs(10),
    })
    .unwrap()
}

// ============================================================================
// Scoring Client
// ============================================================================

mod scoring_client {
    use super::*;

    #[test]
    fn fresh_run_is_normalized() {
        let (endpoint, server) = serve_once("200 OK", fixture("psi_response.json"));
        let metrics = client_for(endpoint)
            .run_audit("https://acme.example/", Strategy::Desktop)
            .expect("audit should succeed");
        let request_line = server.join().unwrap();

        assert!(request_line.starts_with("GET /pagespeedonline/v5/runPagespeed?"));
        assert!(request_line.contains("strategy=desktop"));
        for category in ["performance", "seo", "accessibility", "best-practices"] {
            assert!(request_line.contains(&format!("category={category}")));
        }
        assert!(request_line.contains("key=test-key"));

        assert_eq!(metrics.perf_score, 68);
        assert_eq!(metrics.tool_version, "12.2.1");
    }

    #[test]
    fn upstream_error_message_is_kept() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded for quota metric 'Queries'"}}"#;
        let (endpoint, server) = serve_once("429 Too Many Requests", body.to_string());
        let err = client_for(endpoint)
            .run_audit("https://acme.example/", Strategy::Mobile)
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(err.status_code, Some(429));
        assert_eq!(err.message, "Quota exceeded for quota metric 'Queries'");
    }

    #[test]
    fn error_without_body_uses_status() {
        let (endpoint, server) = serve_once("500 Internal Server Error", String::new());
        let err = client_for(endpoint)
            .run_audit("https://acme.example/", Strategy::Mobile)
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(err.status_code, Some(500));
        assert!(err.message.contains("500"));
    }

    #[test]
    fn unreachable_service_has_no_status() {
        // Bind then drop to get a port nothing listens on
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let err = client_for(format!("http://{addr}/run"))
            .run_audit("https://acme.example/", Strategy::Mobile)
            .unwrap_err();
        assert_eq!(err.status_code, None);
    }
}

// ============================================================================
// Normalization of a recorded response
// ============================================================================

mod normalization {
    use super::*;

    #[test]
    fn scores_and_field_data() {
        let m = recorded_metrics();
        assert_eq!(m.perf_score, 68);
        assert_eq!(m.seo_score, Some(83));
        assert_eq!(m.accessibility_score, Some(90));
        assert_eq!(m.best_practices_score, Some(100));
        assert_eq!(m.lcp, Some(3400.5));
        assert_eq!(m.inp, None);
        // Page-level field data wins; missing page metrics fall back to origin
        assert_eq!(m.crux_lcp, Some(2600.0));
        assert_eq!(m.crux_cls, Some(0.08));
        assert_eq!(m.crux_inp, Some(240.0));
        assert_eq!(m.crux_fcp, Some(1700.0));
    }

    #[test]
    fn static_plan_from_recorded_payload() {
        let m = recorded_metrics();
        let PlanSource::Static(items) = resolve_plan(None, m.raw_payload.as_ref()) else {
            panic!("expected a static plan");
        };
        let ids: Vec<&str> = items.iter().map(|i| i.audit_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["render-blocking-resources", "unused-css-rules", "uses-rel-preconnect"]
        );
        assert_eq!(items[0].impact, Impact::High);
        assert_eq!(items[0].savings.as_deref(), Some("1.2s"));
        assert_eq!(items[1].savings.as_deref(), Some("40 KiB"));
        assert_eq!(items[2].savings, None);
    }
}

// ============================================================================
// Audit Stage
// ============================================================================

mod audit_stage {
    use super::*;

    fn at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn pro_audit_gets_ai_plan_from_quality_model() {
        let service = RecordedService::new(Ok(recorded_metrics()));
        let model = ScriptedModel::new(MODEL_REPLY);
        let request = AuditRequest::new("acme.example", Strategy::Mobile, PlanTier::Pro);

        let outcome = run_audit_pipeline(&service, &planner_with(&model), &request, at()).unwrap();

        assert_eq!(outcome.url, "https://acme.example");
        let plan = outcome.snapshot.ai_action_plan.expect("AI plan expected");
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].title, "Inline critical CSS");
        assert_eq!(
            *model.models.lock().unwrap(),
            vec![ModelTiers::default().quality]
        );
    }

    #[test]
    fn free_audit_never_calls_the_model() {
        let service = RecordedService::new(Ok(recorded_metrics()));
        let model = ScriptedModel::new(MODEL_REPLY);
        let request = AuditRequest::new("https://acme.example/", Strategy::Mobile, PlanTier::Free);

        let outcome = run_audit_pipeline(&service, &planner_with(&model), &request, at()).unwrap();

        assert!(outcome.snapshot.ai_action_plan.is_none());
        assert!(model.models.lock().unwrap().is_empty());
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unusable_model_reply_falls_back_to_static_plan() {
        let service = RecordedService::new(Ok(recorded_metrics()));
        let model = ScriptedModel::new("I could not find anything to improve.");
        let request = AuditRequest::new("acme.example", Strategy::Mobile, PlanTier::Agency);

        let outcome = run_audit_pipeline(&service, &planner_with(&model), &request, at()).unwrap();

        assert!(outcome.snapshot.ai_action_plan.is_none());
        let plan = resolve_plan(None, outcome.snapshot.metrics.raw_payload.as_ref());
        assert_eq!(plan.kind(), "static");
    }

    #[test]
    fn private_address_is_refused_before_any_request() {
        let service = RecordedService::new(Ok(recorded_metrics()));
        let request = AuditRequest::new("http://192.168.1.10/admin", Strategy::Mobile, PlanTier::Pro);

        let err = run_audit_pipeline(&service, &AiPlanner::disabled(), &request, at()).unwrap_err();

        assert!(matches!(err, PipelineError::InvalidUrl(_)));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn service_failure_maps_to_exit_code_one() {
        let service = RecordedService::new(Err(AuditServiceError::from_status(
            400,
            Some("Lighthouse returned error: NO_FCP".to_string()),
        )));
        let request = AuditRequest::new("acme.example", Strategy::Mobile, PlanTier::Free);

        let err = run_audit_pipeline(&service, &AiPlanner::disabled(), &request, at()).unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("NO_FCP"));
    }
}

// ============================================================================
// Report Stage
// ============================================================================

mod report_stage {
    use super::*;

    fn request(format: ReportFormat, tier: PlanTier) -> ReportRequest {
        let mut request = ReportRequest::new(format, tier);
        request.generated_at = Some(Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap());
        request
    }

    #[test]
    fn project_fixture_renders_as_json() {
        let project = read_project(&fixture_path("project.json")).unwrap();
        let bytes = render_project_report(
            &project,
            &request(ReportFormat::Json, PlanTier::Agency),
            &ReportConfig::default(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["brand"]["name"], "Studio North");
        assert_eq!(value["brand"]["logoUrl"], "https://north.example/logo.png");
        assert_eq!(value["summary"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["pages"][0]["label"], "Home");
        assert_eq!(value["pages"][0]["plan"]["source"], "ai");
        assert_eq!(value["pages"][1]["label"], "/pricing");
        assert_eq!(value["pages"][1]["plan"]["source"], "all-clear");
        // No stored payload, so no findings section
        assert!(value["pages"][1]["findings"].is_null());
    }

    #[test]
    fn starter_cannot_export_pdf() {
        let project = read_project(&fixture_path("project.json")).unwrap();
        let err = render_project_report(
            &project,
            &request(ReportFormat::Pdf, PlanTier::Starter),
            &ReportConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("PDF reports"));
    }

    #[test]
    fn free_tier_page_limit() {
        let project = read_project(&fixture_path("project.json")).unwrap();
        let err = render_project_report(
            &project,
            &request(ReportFormat::Text, PlanTier::Free),
            &ReportConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::NotEntitled { .. }));
    }
}
