//! Subscription tiers and the entitlements attached to each.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription level, lowest first.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Starter,
    Pro,
    Agency,
}

impl PlanTier {
    pub const ALL: [Self; 4] = [Self::Free, Self::Starter, Self::Pro, Self::Agency];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Pro => "pro",
            Self::Agency => "agency",
        }
    }

    #[must_use]
    pub const fn limits(self) -> PlanLimits {
        PlanLimits::for_tier(self)
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entitlements for one tier. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub max_projects: Option<u32>,
    pub max_pages_per_project: Option<u32>,
    pub manual_runs_per_month: Option<u32>,
    pub ai_action_plans_per_month: Option<u32>,
    pub pdf_reports: bool,
    pub branding: bool,
}

impl PlanLimits {
    #[must_use]
    pub const fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::Free => Self {
                max_projects: Some(1),
                max_pages_per_project: Some(1),
                manual_runs_per_month: Some(10),
                ai_action_plans_per_month: Some(0),
                pdf_reports: false,
                branding: false,
            },
            PlanTier::Starter => Self {
                max_projects: Some(5),
                max_pages_per_project: Some(5),
                manual_runs_per_month: None,
                ai_action_plans_per_month: Some(30),
                pdf_reports: false,
                branding: false,
            },
            PlanTier::Pro => Self {
                max_projects: Some(20),
                max_pages_per_project: Some(20),
                manual_runs_per_month: None,
                ai_action_plans_per_month: Some(200),
                pdf_reports: true,
                branding: false,
            },
            PlanTier::Agency => Self {
                max_projects: Some(100),
                max_pages_per_project: None,
                manual_runs_per_month: None,
                ai_action_plans_per_month: None,
                pdf_reports: true,
                branding: true,
            },
        }
    }

    /// Whether another AI plan fits in this month's quota.
    #[must_use]
    pub fn allows_ai_plan(&self, used_this_month: u32) -> bool {
        self.ai_action_plans_per_month
            .map_or(true, |quota| used_this_month < quota)
    }

    /// Whether a project may hold `count` pages.
    #[must_use]
    pub fn allows_pages(&self, count: usize) -> bool {
        self.max_pages_per_project
            .map_or(true, |max| count <= max as usize)
    }
}
