//! Prompt construction.

use super::evidence::{CheckEvidence, Evidence};
use crate::grading::{format_optional_metric, metric_target};
use crate::model::{LighthouseResult, MetricKey, NormalizedAuditMetrics};
use std::fmt::Write as _;

/// System prompt shared by every request.
pub const SYSTEM_PROMPT: &str = "You are a senior web performance and technical SEO consultant. \
You know Core Web Vitals (LCP, CLS, INP, FCP, TTFB), technical SEO and accessibility in depth. \
You help developers and agencies fix real problems on their clients' sites, writing clear and \
specific instructions grounded in the evidence you are given.";

const NOT_DETECTED: &str = "not detected";
const NO_CRITICAL_ISSUES: &str = "no critical issues identified";

/// Build the user prompt for one audit.
#[must_use]
pub fn build_user_prompt(
    url: &str,
    metrics: &NormalizedAuditMetrics,
    raw: Option<&LighthouseResult>,
    evidence: &Evidence,
) -> String {
    let stack = raw
        .map(LighthouseResult::detected_stack)
        .filter(|s| !s.is_empty())
        .map_or_else(|| NOT_DETECTED.to_string(), |s| s.join(", "));

    let mut out = String::new();
    out.push_str(
        "Analyse the performance, SEO and accessibility report below and produce a prioritised action plan.\n\n",
    );
    let _ = writeln!(out, "URL: {url}");
    let _ = writeln!(out, "Detected stack: {stack}");

    out.push_str("\nScores:\n");
    let _ = writeln!(out, "- Performance: {}/100", metrics.perf_score);
    let _ = writeln!(out, "- SEO: {}/100 (target 90+)", score(metrics.seo_score));
    let _ = writeln!(
        out,
        "- Accessibility: {}/100 (target 90+)",
        score(metrics.accessibility_score)
    );
    let _ = writeln!(
        out,
        "- Best Practices: {}/100",
        score(metrics.best_practices_score)
    );

    out.push_str("\nCore metrics (lab = synthetic run, field = real users P75):\n");
    for key in MetricKey::ALL {
        let _ = writeln!(
            out,
            "- {} ({}): lab {}, field {} (target {})",
            key.acronym(),
            key.name(),
            format_optional_metric(key, metrics.lab_value(key)),
            format_optional_metric(key, metrics.field_value(key)),
            metric_target(key)
        );
    }

    out.push_str("\nFailing performance checks, worst first:\n");
    push_blocks(&mut out, &evidence.performance);
    out.push_str("\nFailing SEO checks, worst first:\n");
    push_blocks(&mut out, &evidence.seo);

    out.push_str(
        "\nInstructions:
- Write 4 to 6 recommendations, ordered by expected impact. Include SEO fixes when the SEO score is below 90.
- Base every recommendation on the specific resources and figures above. Do not give generic advice.
- Keep \"action\" under 60 words. Put concrete implementation steps in \"steps\".
- If a stack was detected, add a stack-specific hint in \"stackTip\"; omit the field otherwise.
- \"difficulty\" must be one of: easy, medium, hard.

Return ONLY a JSON array, with no markdown and no surrounding text, in exactly this shape:
[
  {
    \"title\": \"Short, direct title\",
    \"action\": \"What to do, specifically\",
    \"steps\": [\"First step\", \"Second step\"],
    \"why\": \"Business impact: conversions, rankings or reach\",
    \"difficulty\": \"easy\",
    \"stackTip\": \"Hint for the detected stack\"
  }
]",
    );
    out
}

fn score(value: Option<u8>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn push_blocks(out: &mut String, checks: &[CheckEvidence]) {
    if checks.is_empty() {
        out.push_str(NO_CRITICAL_ISSUES);
        out.push('\n');
        return;
    }
    for check in checks {
        out.push_str(&check.render());
        out.push('\n');
    }
}
