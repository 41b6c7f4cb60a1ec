//! Audit stage: one fresh run for one page.

use super::PipelineError;
use crate::model::{AuditSnapshot, PlanTier, Strategy};
use crate::pagespeed::AuditService;
use crate::planner::AiPlanner;
use crate::utils::validate_audit_url;
use chrono::{DateTime, Utc};

/// What to audit, and on whose plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    /// URL as typed by the user
    pub url: String,
    pub strategy: Strategy,
    pub tier: PlanTier,
    /// AI plans already generated this month
    pub ai_plans_used: u32,
}

impl AuditRequest {
    #[must_use]
    pub fn new(url: impl Into<String>, strategy: Strategy, tier: PlanTier) -> Self {
        Self {
            url: url.into(),
            strategy,
            tier,
            ai_plans_used: 0,
        }
    }

    #[must_use]
    pub const fn with_ai_plans_used(mut self, used: u32) -> Self {
        self.ai_plans_used = used;
        self
    }
}

/// A finished audit.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    /// Normalized form of the requested URL
    pub url: String,
    pub snapshot: AuditSnapshot,
}

/// Validate the URL, run the audit, and attach an AI plan when the tier's
/// quota allows one.
///
/// Only URL refusal and scoring failures are errors. A missing or failed AI
/// plan leaves `ai_action_plan` empty so readers fall back to the static
/// plan.
pub fn run_audit_pipeline(
    service: &dyn AuditService,
    planner: &AiPlanner,
    request: &AuditRequest,
    audited_at: DateTime<Utc>,
) -> Result<AuditOutcome, PipelineError> {
    let url = validate_audit_url(&request.url)?;
    tracing::info!(
        "Auditing {} ({}) with {}",
        url,
        request.strategy,
        service.name()
    );

    let metrics = service.run_audit(&url, request.strategy)?;
    tracing::info!(
        "Performance {}, SEO {}, accessibility {}",
        metrics.perf_score,
        score_text(metrics.seo_score),
        score_text(metrics.accessibility_score)
    );

    let limits = request.tier.limits();
    let ai_action_plan = if limits.allows_ai_plan(request.ai_plans_used) {
        planner.generate(&url, &metrics, metrics.raw_payload.as_ref(), request.tier)
    } else {
        tracing::info!(
            "AI plan quota of the {} plan is used up ({} this month)",
            request.tier,
            request.ai_plans_used
        );
        None
    };

    Ok(AuditOutcome {
        url,
        snapshot: AuditSnapshot {
            metrics,
            audited_at,
            ai_action_plan,
        },
    })
}

fn score_text(score: Option<u8>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| s.to_string())
}
