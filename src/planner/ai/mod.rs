//! Model-generated remediation plans.
//!
//! [`AiPlanner::generate`] never fails outward. With no client configured it
//! returns `None` without any outbound call; any failure after that point is
//! logged and also collapses to `None`, leaving the caller to fall back to the
//! static plan.
//!
//! ```ignore
//! let planner = AiPlanner::from_config(&config.ai);
//! let plan = planner.generate(&url, &metrics, metrics.raw_payload.as_ref(), tier);
//! ```

mod client;
mod evidence;
mod parse;
mod prompt;

pub use client::{
    AiPlanFailure, AnthropicClient, AnthropicConfig, ContentBlock, Message, MessageClient,
    MessageRequest, MessageResponse, DEFAULT_API_VERSION, DEFAULT_ENDPOINT,
};
pub use evidence::{describe_item, CheckEvidence, Evidence};
pub use parse::parse_action_items;
pub use prompt::{build_user_prompt, SYSTEM_PROMPT};

use crate::config::AiConfig;
use crate::model::{AiActionItem, LighthouseResult, NormalizedAuditMetrics, PlanTier};
use std::sync::Arc;

pub const DEFAULT_FAST_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_QUALITY_MODEL: &str = "claude-sonnet-4-6";
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Model identifiers for the two cost tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTiers {
    /// Used for the two lower plan tiers
    pub fast: String,
    /// Used for the two upper plan tiers
    pub quality: String,
}

impl Default for ModelTiers {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_MODEL.to_string(),
            quality: DEFAULT_QUALITY_MODEL.to_string(),
        }
    }
}

/// Pick the model for a plan tier.
#[must_use]
pub fn select_model(tier: PlanTier, models: &ModelTiers) -> &str {
    match tier {
        PlanTier::Free | PlanTier::Starter => &models.fast,
        PlanTier::Pro | PlanTier::Agency => &models.quality,
    }
}

/// Generates action plans through an injected model client.
#[derive(Clone)]
pub struct AiPlanner {
    client: Option<Arc<dyn MessageClient>>,
    models: ModelTiers,
    max_tokens: u32,
}

impl AiPlanner {
    #[must_use]
    pub fn new(client: Option<Arc<dyn MessageClient>>, models: ModelTiers, max_tokens: u32) -> Self {
        Self {
            client,
            models,
            max_tokens,
        }
    }

    /// Planner for the configured model API. The HTTP client is only built
    /// when a key is set; a client that cannot be built disables the planner.
    #[must_use]
    pub fn from_config(config: &AiConfig) -> Self {
        let client: Option<Arc<dyn MessageClient>> = match config.to_client_config() {
            Some(client_config) => match AnthropicClient::new(client_config) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    tracing::warn!("AI planner disabled: {}", e);
                    None
                }
            },
            None => {
                tracing::debug!("No model API key configured, AI planner disabled");
                None
            }
        };
        Self::new(client, config.models(), config.max_tokens)
    }

    /// A planner with no credential: always returns `None`.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(None, ModelTiers::default(), DEFAULT_MAX_TOKENS)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    #[must_use]
    pub const fn models(&self) -> &ModelTiers {
        &self.models
    }

    /// Generate a plan, or `None` when no credential is configured or
    /// anything goes wrong.
    pub fn generate(
        &self,
        url: &str,
        metrics: &NormalizedAuditMetrics,
        raw: Option<&LighthouseResult>,
        tier: PlanTier,
    ) -> Option<Vec<AiActionItem>> {
        let client = self.client.as_ref()?;
        let model = select_model(tier, &self.models);

        match self.try_generate(client.as_ref(), model, url, metrics, raw) {
            Ok(items) => {
                tracing::info!("AI plan for {} has {} items ({})", url, items.len(), model);
                Some(items)
            }
            Err(failure) => {
                tracing::warn!("AI plan for {} unavailable, using static plan: {}", url, failure);
                None
            }
        }
    }

    fn try_generate(
        &self,
        client: &dyn MessageClient,
        model: &str,
        url: &str,
        metrics: &NormalizedAuditMetrics,
        raw: Option<&LighthouseResult>,
    ) -> Result<Vec<AiActionItem>, AiPlanFailure> {
        let evidence = raw.map(Evidence::extract).unwrap_or_default();
        tracing::debug!(
            "Prompting {} with {} performance and {} SEO checks",
            model,
            evidence.performance.len(),
            evidence.seo.len()
        );

        let request = MessageRequest::single_turn(
            model,
            self.max_tokens,
            SYSTEM_PROMPT,
            build_user_prompt(url, metrics, raw, &evidence),
        );
        let response = client.create_message(&request)?;
        let text = response.first_text().ok_or(AiPlanFailure::NoText)?;
        parse_action_items(text)
    }
}

impl std::fmt::Debug for AiPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiPlanner")
            .field("enabled", &self.is_enabled())
            .field("models", &self.models)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
