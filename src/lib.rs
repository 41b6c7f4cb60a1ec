//! **Audit grading, remediation planning and client-ready reports for websites.**
//!
//! `perfally` runs performance, SEO and accessibility audits through the
//! PageSpeed Insights API, grades the results against the Core Web Vitals
//! thresholds, turns failing checks into an ordered action plan, and lays
//! whole projects out as paginated documents.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: Audit metrics, the typed upstream payload, plan items,
//!   projects and subscription tiers.
//! - **[`grading`]**: Good / needs-improvement / poor grading of metric values
//!   and scores, and the weighted site-health score.
//! - **[`pagespeed`]**: The [`AuditService`](pagespeed::AuditService) trait and
//!   its PageSpeed Insights client. Lab values come from the synthetic run,
//!   field values from real-user data when the site has enough traffic.
//! - **[`planner`]**: A deterministic rule table over failing checks and an
//!   AI planner that fails closed.
//! - **[`reports`]**: Report assembly and the PDF, text and JSON renderers.
//! - **[`pipeline`]**: Audit and report stages with plan entitlements applied.
//!
//! ## Getting Started: Grading a Stored Audit
//!
//! ```
//! use perfally::grading::{grade_metric, site_health_score, Grade};
//! use perfally::model::MetricKey;
//!
//! assert_eq!(grade_metric(MetricKey::Lcp, 2400.0), Grade::Good);
//! assert_eq!(grade_metric(MetricKey::Cls, 0.3), Grade::Poor);
//! assert_eq!(site_health_score(80, Some(90), Some(100)), 89);
//! ```
//!
//! ## Rendering a Report
//!
//! ```no_run
//! use std::path::Path;
//! use perfally::config::ReportConfig;
//! use perfally::model::PlanTier;
//! use perfally::pipeline::{read_project, render_project_report, ReportRequest};
//! use perfally::reports::ReportFormat;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let project = read_project(Path::new("project.json"))?;
//!     let request = ReportRequest::new(ReportFormat::Pdf, PlanTier::Pro);
//!     let pdf = render_project_report(&project, &request, &ReportConfig::default())?;
//!     std::fs::write("report.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `perfally` binary wraps these stages as `audit`, `plan` and `report`
//! subcommands. See `perfally --help` for exit codes.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Scores and page geometry are small bounded numbers
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod grading;
pub mod model;
pub mod pagespeed;
pub mod pipeline;
pub mod planner;
pub mod reports;
pub mod utils;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{AuditServiceError, ErrorContext, PerfAllyError, Result};
pub use grading::{grade_metric, grade_score, site_health_score, Grade};
pub use model::{AuditSnapshot, NormalizedAuditMetrics, PlanTier, ProjectReport, Strategy};
pub use pagespeed::{AuditService, PageSpeedClient};
pub use planner::{get_action_plan, resolve_plan, AiPlanner, PlanSource};
pub use reports::{create_renderer, ReportFormat, ReportInput, ReportRenderer};
pub use utils::validate_audit_url;
