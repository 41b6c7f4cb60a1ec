//! Remediation planning.
//!
//! Two planners feed the report's action-plan section:
//! - [`static_plan`]: deterministic rules over failing performance checks
//! - [`ai`]: model-generated, evidence-driven plans that fail closed
//!
//! [`resolve_plan`] picks between them.

pub mod ai;
mod chain;
pub mod static_plan;

pub use ai::{select_model, AiPlanFailure, AiPlanner, MessageClient, ModelTiers};
pub use chain::{resolve_plan, PlanSource};
pub use static_plan::{get_action_plan, rule_for, StaticRule, STATIC_RULES};
