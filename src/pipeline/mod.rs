//! Pipeline orchestration for audits and reports.
//!
//! This module holds the glue shared by the CLI command handlers:
//! validate → audit → plan → snapshot for a single page, and
//! load → gate → render → write for a project report.

mod audit_stage;
mod output;
mod report_stage;
mod store;

pub use audit_stage::{run_audit_pipeline, AuditOutcome, AuditRequest};
pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::{check_entitlement, render_project_report, ReportRequest};
pub use store::{read_project, read_snapshot, snapshot_json};

use crate::error::{AuditServiceError, PerfAllyError};
use crate::utils::UrlValidationError;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The audit target was refused before any request was made
    #[error("{0}")]
    InvalidUrl(#[from] UrlValidationError),

    /// The scoring service produced no data
    #[error("Audit failed: {0}")]
    Audit(#[from] AuditServiceError),

    /// The plan tier does not include the requested operation
    #[error("Not included in the {tier} plan: {what}")]
    NotEntitled { tier: String, what: String },

    /// Reading inputs, rendering or writing output failed
    #[error(transparent)]
    Other(#[from] PerfAllyError),
}

impl PipelineError {
    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Audit(_) => exit_codes::AUDIT_FAILED,
            Self::NotEntitled { .. } => exit_codes::NOT_ENTITLED,
            Self::InvalidUrl(_) | Self::Other(_) => exit_codes::ERROR,
        }
    }
}

impl From<crate::reports::ReportError> for PipelineError {
    fn from(err: crate::reports::ReportError) -> Self {
        Self::Other(err.into())
    }
}

/// Exit codes for scripting
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// The scoring service failed or was unreachable
    pub const AUDIT_FAILED: i32 = 1;
    /// The plan tier does not include the requested operation
    pub const NOT_ENTITLED: i32 = 2;
    /// Any other error
    pub const ERROR: i32 = 3;
}
