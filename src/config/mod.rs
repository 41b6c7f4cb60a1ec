//! Configuration for perfally.
//!
//! This module provides:
//! - Type-safe configuration structures with complete defaults
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - Credential overrides from the environment
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use perfally::config::AppConfig;
//!
//! // File (if any) plus environment
//! let (config, loaded_from) = AppConfig::load(None);
//!
//! // Builder
//! let config = AppConfig::builder()
//!     .strategy(Strategy::Desktop)
//!     .report_format(ReportFormat::Json)
//!     .build();
//! ```
//!
//! # Configuration File
//!
//! Place a `.perfally.yaml` file in your project root or `~/.config/perfally/`:
//!
//! ```yaml
//! pagespeed:
//!   strategy: desktop
//! report:
//!   product_name: Site Check
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{AiConfig, AppConfig, AppConfigBuilder, PageSpeedSettings, ReportConfig};
pub use validation::{ConfigError, Validatable, MAX_TOKENS_RANGE};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.perfally.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        let value: serde_json::Value = serde_json::from_str(&schema).unwrap();
        let properties = value["properties"].as_object().unwrap();
        for section in ["pagespeed", "ai", "report"] {
            assert!(properties.contains_key(section), "missing {section}");
        }
    }
}
