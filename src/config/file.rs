//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery,
//! then layering credentials from the environment.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".perfally.yaml",
    ".perfally.yml",
    "perfally.yaml",
    "perfally.yml",
];

/// Scoring API key variables, first match wins.
pub const PAGESPEED_KEY_VARS: &[&str] = &["PERFALLY_PAGESPEED_API_KEY", "GOOGLE_API_KEY"];
/// Model API key variables, first match wins.
pub const AI_KEY_VARS: &[&str] = &["PERFALLY_AI_API_KEY", "ANTHROPIC_API_KEY"];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/perfally/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // 1. Use explicit path if provided
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    // 2. Search current directory
    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    // 3. Search git root (if in a repo)
    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    // 4. Search user config directory
    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("perfally")) {
            return Some(path);
        }
    }

    // 5. Search home directory
    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Load config from discovered file, or return default.
///
/// An explicit path that does not exist is reported and skipped like any
/// other unreadable file.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    if let Some(path) = explicit_path.filter(|p| !p.exists()) {
        tracing::warn!("Config file {} does not exist, using defaults", path.display());
    }
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Environment Overrides
// ============================================================================

impl AppConfig {
    /// Fill credentials from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Fill credentials through `lookup`. A variable that is set wins over
    /// the file; an empty value counts as unset.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        if let Some(key) = first(PAGESPEED_KEY_VARS) {
            self.pagespeed.api_key = Some(key);
        }
        if let Some(key) = first(AI_KEY_VARS) {
            self.ai.api_key = Some(key);
        }
        // Keys left empty in the file are treated as absent
        if self.pagespeed.api_key.as_deref().is_some_and(str::is_empty) {
            self.pagespeed.api_key = None;
        }
        if self.ai.api_key.as_deref().is_some_and(str::is_empty) {
            self.ai.api_key = None;
        }
    }

    /// Load from file, then apply environment overrides.
    #[must_use]
    pub fn load(config_path: Option<&Path>) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.apply_env_overrides();
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    r"# PerfAlly Configuration File
# ============================
#
# Place it at:
#   - .perfally.yaml in your project root
#   - ~/.config/perfally/perfally.yaml for global config
#
# Credentials are better kept in the environment:
#   PERFALLY_PAGESPEED_API_KEY (or GOOGLE_API_KEY)
#   PERFALLY_AI_API_KEY (or ANTHROPIC_API_KEY)

# Scoring API
pagespeed:
  endpoint: https://www.googleapis.com/pagespeedonline/v5/runPagespeed
  # api_key: ...
  timeout_secs: 60
  # mobile or desktop
  strategy: mobile

# Generated action plans. Without a key, plans come from the built-in rules.
ai:
  endpoint: https://api.anthropic.com/v1/messages
  # api_key: ...
  fast_model: claude-haiku-4-5-20251001
  quality_model: claude-sonnet-4-6
  # 256 to 8192
  max_tokens: 2048
  timeout_secs: 60
  api_version: 2023-06-01

# Report defaults, used when no agency branding applies
report:
  # pdf, text or json
  format: pdf
  product_name: PerfAlly
  product_contact: perfally.com
  default_accent: '#2563eb'
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
