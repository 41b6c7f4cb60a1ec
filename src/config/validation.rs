//! Configuration validation for perfally.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AiConfig, AppConfig, PageSpeedSettings, ReportConfig};
use crate::reports::Rgb;

/// Accepted range for the model output budget.
pub const MAX_TOKENS_RANGE: std::ops::RangeInclusive<u32> = 256..=8192;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.pagespeed.validate());
        errors.extend(self.ai.validate());
        errors.extend(self.report.validate());
        errors
    }
}

impl Validatable for PageSpeedSettings {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_endpoint(&mut errors, "pagespeed.endpoint", &self.endpoint);
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "pagespeed.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }
        errors
    }
}

impl Validatable for AiConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        check_endpoint(&mut errors, "ai.endpoint", &self.endpoint);
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new("ai.timeout_secs", "Timeout must be greater than 0"));
        }
        if !MAX_TOKENS_RANGE.contains(&self.max_tokens) {
            errors.push(ConfigError::new(
                "ai.max_tokens",
                format!(
                    "max_tokens must be between {} and {}, got {}",
                    MAX_TOKENS_RANGE.start(),
                    MAX_TOKENS_RANGE.end(),
                    self.max_tokens
                ),
            ));
        }
        for (field, model) in [
            ("ai.fast_model", &self.fast_model),
            ("ai.quality_model", &self.quality_model),
        ] {
            if model.trim().is_empty() {
                errors.push(ConfigError::new(field, "Model identifier must not be empty"));
            }
        }
        errors
    }
}

impl Validatable for ReportConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !is_hex_color(&self.default_accent) {
            errors.push(ConfigError::new(
                "report.default_accent",
                format!(
                    "Invalid color '{}'. Expected #rrggbb",
                    self.default_accent
                ),
            ));
        }
        if self.product_name.trim().is_empty() {
            errors.push(ConfigError::new(
                "report.product_name",
                "Product name must not be empty",
            ));
        }
        errors
    }
}

fn check_endpoint(errors: &mut Vec<ConfigError>, field: &str, endpoint: &str) {
    match url::Url::parse(endpoint) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(ConfigError::new(
            field,
            format!("Unsupported scheme '{}', expected http or https", parsed.scheme()),
        )),
        Err(e) => errors.push(ConfigError::new(field, format!("Invalid URL '{endpoint}': {e}"))),
    }
}

/// `#rrggbb`, with the leading `#` required.
fn is_hex_color(value: &str) -> bool {
    value.len() == 7 && value.starts_with('#') && Rgb::from_hex(value).is_some()
}
