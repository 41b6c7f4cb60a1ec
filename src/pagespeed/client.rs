//! Scoring API HTTP client.

use super::normalize::normalize_response;
use super::response::{PsiErrorBody, PsiResponse};
use super::AuditService;
use crate::error::AuditServiceError;
use crate::model::{category_ids, NormalizedAuditMetrics, Strategy};
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::time::Duration;

/// Default scoring endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Scoring client configuration.
#[derive(Debug, Clone)]
pub struct PageSpeedConfig {
    /// Full URL of the run endpoint
    pub endpoint: String,
    /// API key; without one the upstream applies a much lower daily quota
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PageSpeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            // Full runs routinely take 20-40s upstream
            timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP client for the scoring API.
///
/// Every call requests a fresh run; responses are never cached.
pub struct PageSpeedClient {
    client: Client,
    config: PageSpeedConfig,
}

impl PageSpeedClient {
    /// Create a new scoring client.
    pub fn new(config: PageSpeedConfig) -> Result<Self, AuditServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(AuditServiceError::transport)?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &PageSpeedConfig {
        &self.config
    }

    /// Query parameters for one run: url, strategy, every category, and the
    /// key when configured.
    #[must_use]
    pub fn query_params(&self, url: &str, strategy: Strategy) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("url", url.to_string()),
            ("strategy", strategy.as_str().to_string()),
        ];
        params.extend(
            category_ids::ALL
                .iter()
                .map(|c| ("category", (*c).to_string())),
        );
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            params.push(("key", key.to_string()));
        }
        params
    }

    fn fetch(&self, url: &str, strategy: Strategy) -> Result<PsiResponse, AuditServiceError> {
        tracing::debug!("Requesting {} audit for {}", strategy, url);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&self.query_params(url, strategy))
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .map_err(AuditServiceError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let upstream = response
                .json::<PsiErrorBody>()
                .ok()
                .and_then(PsiErrorBody::message);
            tracing::debug!("Scoring API returned status {}", status.as_u16());
            return Err(AuditServiceError::from_status(status.as_u16(), upstream));
        }

        response.json::<PsiResponse>().map_err(|e| {
            AuditServiceError::new(format!("Scoring API returned an unreadable response: {e}"), None)
        })
    }
}

impl AuditService for PageSpeedClient {
    fn run_audit(
        &self,
        url: &str,
        strategy: Strategy,
    ) -> Result<NormalizedAuditMetrics, AuditServiceError> {
        let response = self.fetch(url, strategy)?;
        let metrics = normalize_response(response)?;
        tracing::debug!(
            "Audit of {} finished: perf {} (engine {})",
            url,
            metrics.perf_score,
            metrics.tool_version
        );
        Ok(metrics)
    }

    fn name(&self) -> &'static str {
        "PageSpeed Insights"
    }
}
