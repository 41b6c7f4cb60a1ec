//! Plan command handler.
//!
//! Implements the `plan` subcommand: print the action plan a report would
//! show for one stored audit.

use crate::error::ErrorContext;
use crate::model::{ActionItem, AiActionItem};
use crate::pipeline::{exit_codes, read_snapshot, write_output, OutputTarget};
use crate::planner::{resolve_plan, PlanSource};
use crate::reports::layout::wrap;
use anyhow::Result;
use clap::ValueEnum;
use std::fmt::Write as _;
use std::path::Path;

const WIDTH: usize = 88;

/// Output format for the `plan` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    #[default]
    Text,
    Json,
}

/// Run the plan command
pub fn run_plan(snapshot_path: &Path, format: PlanFormat, output: &OutputTarget) -> Result<i32> {
    let snapshot = read_snapshot(snapshot_path)?;
    let plan = resolve_plan(
        snapshot.ai_action_plan.as_deref(),
        snapshot.metrics.raw_payload.as_ref(),
    );
    tracing::debug!("Resolved {} plan with {} items", plan.kind(), plan.len());

    let content = match format {
        PlanFormat::Text => render_plan_text(&plan),
        PlanFormat::Json => {
            let mut json = serde_json::to_string_pretty(&plan).context("encoding plan")?;
            json.push('\n');
            json
        }
    };
    write_output(content.as_bytes(), output, false)?;
    Ok(exit_codes::SUCCESS)
}

/// Plain-text rendering of a resolved plan.
#[must_use]
pub fn render_plan_text(plan: &PlanSource) -> String {
    let mut out = String::new();
    match plan {
        PlanSource::Ai(items) => {
            let _ = writeln!(out, "Action plan ({} recommendations)\n", items.len());
            for (index, item) in items.iter().enumerate() {
                write_ai_item(&mut out, index + 1, item);
            }
        }
        PlanSource::Static(items) => {
            let _ = writeln!(out, "Action plan ({} fixes, highest impact first)\n", items.len());
            for (index, item) in items.iter().enumerate() {
                write_static_item(&mut out, index + 1, item);
            }
        }
        PlanSource::AllClear => {
            out.push_str("No critical issues found. Keep monitoring to catch regressions early.\n");
        }
    }
    out
}

fn write_wrapped(out: &mut String, text: &str, indent: usize) {
    let pad = " ".repeat(indent);
    for row in wrap(text, WIDTH - indent) {
        let _ = writeln!(out, "{pad}{row}");
    }
}

fn write_ai_item(out: &mut String, number: usize, item: &AiActionItem) {
    let _ = writeln!(out, "{number}. {} [{}]", item.title, item.difficulty.label());
    write_wrapped(out, &item.action, 3);
    for (step_number, step) in item.steps.iter().enumerate() {
        write_wrapped(out, &format!("{}) {step}", step_number + 1), 5);
    }
    write_wrapped(out, &format!("Why: {}", item.why), 3);
    if let Some(tip) = item.stack_tip.as_deref().filter(|t| !t.trim().is_empty()) {
        write_wrapped(out, &format!("Stack tip: {tip}"), 3);
    }
    out.push('\n');
}

fn write_static_item(out: &mut String, number: usize, item: &ActionItem) {
    let _ = writeln!(out, "{number}. {} ({})", item.title, item.impact.label());
    write_wrapped(out, &item.fix, 3);
    if let Some(savings) = &item.savings {
        let _ = writeln!(out, "   Potential savings: {savings}");
    }
    out.push('\n');
}
