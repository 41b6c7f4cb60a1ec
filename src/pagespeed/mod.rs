//! External audit client.
//!
//! Runs a fresh performance/SEO/accessibility audit through the upstream
//! scoring service and flattens the response into
//! [`NormalizedAuditMetrics`](crate::model::NormalizedAuditMetrics).
//!
//! The service sits behind the [`AuditService`] trait so the pipeline can be
//! driven by a stub in tests.

mod client;
mod normalize;
mod response;

pub use client::{PageSpeedClient, PageSpeedConfig, DEFAULT_ENDPOINT};
pub use normalize::{normalize, normalize_response};
pub use response::{CruxExperience, CruxMetric, CruxMetrics, PsiResponse};

use crate::error::AuditServiceError;
use crate::model::{NormalizedAuditMetrics, Strategy};

/// Source of fresh audit runs.
///
/// Implementations must not serve cached results. Timeouts are enforced by
/// the implementation's transport; there is no retry at this layer.
pub trait AuditService: Send + Sync {
    /// Run one audit of `url` with the given device strategy.
    fn run_audit(
        &self,
        url: &str,
        strategy: Strategy,
    ) -> Result<NormalizedAuditMetrics, AuditServiceError>;

    /// Human-readable name of the backing service.
    fn name(&self) -> &'static str;
}
