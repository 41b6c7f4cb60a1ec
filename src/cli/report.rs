//! Report command handler.
//!
//! Implements the `report` subcommand: one paginated document for a whole
//! project.

use super::finish;
use crate::config::ReportConfig;
use crate::pipeline::{
    read_project, render_project_report, write_output, OutputTarget, PipelineError, ReportRequest,
};
use anyhow::Result;
use std::path::Path;

/// Run the report command
pub fn run_report(
    project_path: &Path,
    request: &ReportRequest,
    config: &ReportConfig,
    output: &OutputTarget,
) -> Result<i32> {
    finish(render_and_write(project_path, request, config, output))
}

fn render_and_write(
    project_path: &Path,
    request: &ReportRequest,
    config: &ReportConfig,
    output: &OutputTarget,
) -> std::result::Result<(), PipelineError> {
    let report = read_project(project_path)?;
    let bytes = render_project_report(&report, request, config)?;
    write_output(&bytes, output, request.format.is_binary())?;
    Ok(())
}
