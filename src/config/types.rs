//! Configuration types for perfally.
//!
//! Every section has complete defaults, so an empty file (or no file at all)
//! is a valid configuration.

use crate::model::Strategy;
use crate::pagespeed::{PageSpeedConfig, DEFAULT_ENDPOINT as PAGESPEED_ENDPOINT};
use crate::planner::ai::{
    AnthropicConfig, ModelTiers, DEFAULT_API_VERSION, DEFAULT_ENDPOINT as AI_ENDPOINT,
    DEFAULT_FAST_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_QUALITY_MODEL,
};
use crate::reports::{
    ReportFormat, ReportOptions, DEFAULT_ACCENT, DEFAULT_PRODUCT_CONTACT, DEFAULT_PRODUCT_NAME,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration, loaded from a config file and then
/// layered with environment overrides and CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Scoring API settings
    pub pagespeed: PageSpeedSettings,
    /// Model API settings for generated action plans
    pub ai: AiConfig,
    /// Report defaults
    pub report: ReportConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the scoring API key.
    pub fn pagespeed_key(mut self, key: impl Into<String>) -> Self {
        self.config.pagespeed.api_key = Some(key.into());
        self
    }

    /// Set the default device strategy.
    pub const fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.pagespeed.strategy = strategy;
        self
    }

    /// Set the model API key.
    pub fn ai_key(mut self, key: impl Into<String>) -> Self {
        self.config.ai.api_key = Some(key.into());
        self
    }

    /// Set the default report format.
    pub const fn report_format(mut self, format: ReportFormat) -> Self {
        self.config.report.format = format;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Scoring API
// ============================================================================

/// Scoring API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PageSpeedSettings {
    /// Run endpoint
    pub endpoint: String,
    /// API key (also read from `PERFALLY_PAGESPEED_API_KEY` / `GOOGLE_API_KEY`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Default device strategy for new audits
    pub strategy: Strategy,
}

impl Default for PageSpeedSettings {
    fn default() -> Self {
        Self {
            endpoint: PAGESPEED_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 60,
            strategy: Strategy::Mobile,
        }
    }
}

impl PageSpeedSettings {
    /// Client configuration for these settings.
    #[must_use]
    pub fn to_client_config(&self) -> PageSpeedConfig {
        PageSpeedConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

// ============================================================================
// Model API
// ============================================================================

/// Model API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AiConfig {
    /// Messages endpoint
    pub endpoint: String,
    /// API key (also read from `PERFALLY_AI_API_KEY` / `ANTHROPIC_API_KEY`).
    /// Without one, plans fall back to the static rule table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used for the free and starter tiers
    pub fast_model: String,
    /// Model used for the pro and agency tiers
    pub quality_model: String,
    /// Output token budget per request
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API version header value
    pub api_version: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: AI_ENDPOINT.to_string(),
            api_key: None,
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            quality_model: DEFAULT_QUALITY_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: 60,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl AiConfig {
    #[must_use]
    pub fn models(&self) -> ModelTiers {
        ModelTiers {
            fast: self.fast_model.clone(),
            quality: self.quality_model.clone(),
        }
    }

    /// Client configuration, or `None` when no key is set.
    #[must_use]
    pub fn to_client_config(&self) -> Option<AnthropicConfig> {
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        Some(AnthropicConfig {
            endpoint: self.endpoint.clone(),
            api_key: key.to_string(),
            api_version: self.api_version.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Report defaults. Product identity is used whenever a report carries no
/// agency branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReportConfig {
    /// Default output format
    pub format: ReportFormat,
    /// Product name shown in headers and footers
    pub product_name: String,
    /// Product contact shown in footers
    pub product_contact: String,
    /// Accent color (`#rrggbb`)
    pub default_accent: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Pdf,
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            product_contact: DEFAULT_PRODUCT_CONTACT.to_string(),
            default_accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl ReportConfig {
    /// Render options using these product defaults.
    #[must_use]
    pub fn to_options(&self) -> ReportOptions {
        ReportOptions {
            product_name: self.product_name.clone(),
            product_contact: self.product_contact.clone(),
            default_accent: self.default_accent.clone(),
            ..ReportOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.pagespeed.timeout_secs, 60);
        assert_eq!(config.pagespeed.strategy, Strategy::Mobile);
        assert_eq!(config.ai.max_tokens, 2048);
        assert_eq!(config.ai.fast_model, DEFAULT_FAST_MODEL);
        assert_eq!(config.report.format, ReportFormat::Pdf);
        assert_eq!(config.report.default_accent, "#2563eb");
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .pagespeed_key("psi")
            .ai_key("model")
            .strategy(Strategy::Desktop)
            .report_format(ReportFormat::Json)
            .build();
        assert_eq!(config.pagespeed.api_key.as_deref(), Some("psi"));
        assert_eq!(config.ai.api_key.as_deref(), Some("model"));
        assert_eq!(config.pagespeed.strategy, Strategy::Desktop);
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn test_ai_client_config_requires_key() {
        let mut ai = AiConfig::default();
        assert!(ai.to_client_config().is_none());
        ai.api_key = Some(String::new());
        assert!(ai.to_client_config().is_none());
        ai.api_key = Some("k".to_string());
        let client = ai.to_client_config().unwrap();
        assert_eq!(client.api_key, "k");
        assert_eq!(client.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_pagespeed_client_config_drops_empty_key() {
        let settings = PageSpeedSettings {
            api_key: Some(String::new()),
            timeout_secs: 5,
            ..PageSpeedSettings::default()
        };
        let client = settings.to_client_config();
        assert!(client.api_key.is_none());
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_report_options_carry_product_identity() {
        let report = ReportConfig {
            product_name: "Lens".to_string(),
            ..ReportConfig::default()
        };
        let options = report.to_options();
        assert_eq!(options.product_name, "Lens");
        assert_eq!(options.product_contact, DEFAULT_PRODUCT_CONTACT);
    }
}
