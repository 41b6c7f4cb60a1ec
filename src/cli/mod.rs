//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler returns the process exit code; only unexpected failures
//! (unreadable inputs, failed writes) come back as errors.

mod audit;
mod config;
mod plan;
mod report;

pub use audit::run_audit;
pub use config::{run_config, ConfigAction};
pub use plan::{render_plan_text, run_plan, PlanFormat};
pub use report::run_report;

use crate::pipeline::{exit_codes, PipelineError};
use anyhow::Result;

/// Map a pipeline result to an exit code. Refusals and upstream failures are
/// reported on stderr; anything else is returned as an error.
fn finish(result: std::result::Result<(), PipelineError>) -> Result<i32> {
    match result {
        Ok(()) => Ok(exit_codes::SUCCESS),
        Err(PipelineError::Other(e)) => Err(e.into()),
        Err(e) => {
            tracing::error!("{}", e);
            Ok(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuditServiceError, PerfAllyError};

    #[test]
    fn test_finish_codes() {
        assert_eq!(finish(Ok(())).unwrap(), 0);
        let audit = PipelineError::Audit(AuditServiceError::transport("timed out"));
        assert_eq!(finish(Err(audit)).unwrap(), 1);
        let other = PipelineError::Other(PerfAllyError::validation("bad input"));
        assert!(finish(Err(other)).is_err());
    }
}
