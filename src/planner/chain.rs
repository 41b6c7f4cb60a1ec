//! Plan source resolution.
//!
//! Candidate sources are tried in priority order and the first non-empty one
//! wins: a stored AI plan, then the static plan, then the all-clear state.

use super::static_plan::get_action_plan;
use crate::model::{ActionItem, AiActionItem, LighthouseResult};
use serde::Serialize;

/// The plan shown for one audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "items", rename_all = "kebab-case")]
pub enum PlanSource {
    Ai(Vec<AiActionItem>),
    Static(Vec<ActionItem>),
    /// No failing checks worth acting on
    AllClear,
}

impl PlanSource {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ai(_) => "ai",
            Self::Static(_) => "static",
            Self::AllClear => "all-clear",
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ai(items) => items.len(),
            Self::Static(items) => items.len(),
            Self::AllClear => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Candidate<'a> = Box<dyn Fn() -> Option<PlanSource> + 'a>;

/// Resolve the plan for one audit.
#[must_use]
pub fn resolve_plan(ai: Option<&[AiActionItem]>, raw: Option<&LighthouseResult>) -> PlanSource {
    let candidates: [Candidate<'_>; 2] = [
        Box::new(move || {
            ai.filter(|items| !items.is_empty())
                .map(|items| PlanSource::Ai(items.to_vec()))
        }),
        Box::new(move || {
            raw.map(get_action_plan)
                .filter(|items| !items.is_empty())
                .map(PlanSource::Static)
        }),
    ];
    candidates
        .iter()
        .find_map(|candidate| candidate())
        .unwrap_or(PlanSource::AllClear)
}
