//! Data model for audits, plans and reports.
//!
//! The upstream payload is decoded once into [`LighthouseResult`]; everything
//! downstream (grading, planners, report sections) works on these types.

mod action;
mod metrics;
mod payload;
mod project;
mod tier;

pub use action::{ActionItem, AiActionItem, Difficulty, Impact};
pub use metrics::{MetricKey, MetricUnit, NormalizedAuditMetrics, Strategy};
pub use payload::{
    category_ids, AuditDetails, AuditRecord, AuditRef, Category, DetailItem, LighthouseResult,
    StackPack,
};
pub use project::{AuditSnapshot, Branding, Page, PageEntry, Project, ProjectReport};
pub use tier::{PlanLimits, PlanTier};
