//! Config command handler.
//!
//! Implements the `config` subcommand: inspect, validate and scaffold the
//! configuration file.

use crate::config::{
    discover_config_file, generate_example_config, generate_json_schema, AppConfig, Validatable,
};
use crate::pipeline::exit_codes;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

const REDACTED: &str = "********";

/// Sub-subcommands for the `config` command
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (file merged with environment), keys redacted
    Show,
    /// Print config file search paths and the discovered config file
    Path,
    /// Validate the effective configuration
    Check,
    /// Print JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a commented example config file
    Example,
    /// Write a commented example .perfally.yaml
    Init {
        /// Target file (default: .perfally.yaml in the current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Run a config action. `explicit` is the `--config` flag.
pub fn run_config(action: &ConfigAction, explicit: Option<&Path>) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = AppConfig::load(explicit);
            match &loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml::to_string(&redacted(config))
                .context("failed to serialize config")?;
            print!("{yaml}");
            Ok(exit_codes::SUCCESS)
        }
        ConfigAction::Path => {
            let search_paths = [
                std::env::current_dir().ok(),
                dirs::config_dir().map(|p| p.join("perfally")),
                dirs::home_dir(),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {}", path.display());
            }
            match discover_config_file(explicit) {
                Some(found) => println!("{}", found.display()),
                None => eprintln!("No config file found"),
            }
            Ok(exit_codes::SUCCESS)
        }
        ConfigAction::Check => {
            let (config, _) = AppConfig::load(explicit);
            Ok(check(&config))
        }
        ConfigAction::Schema { output } => {
            let schema = generate_json_schema().context("failed to generate schema")?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }
        ConfigAction::Example => {
            print!("{}", generate_example_config());
            Ok(exit_codes::SUCCESS)
        }
        ConfigAction::Init { path } => {
            let target = match path {
                Some(path) => path.clone(),
                None => std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".perfally.yaml"),
            };
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Report validation problems on stderr and return the exit code.
fn check(config: &AppConfig) -> i32 {
    let errors = config.validate();
    if errors.is_empty() {
        eprintln!("Configuration is valid");
        if config.pagespeed.api_key.is_none() {
            eprintln!("  note: no PageSpeed key; audits use the shared anonymous quota");
        }
        if config.ai.api_key.is_none() {
            eprintln!("  note: no AI key; plans come from the built-in rules");
        }
        return exit_codes::SUCCESS;
    }
    for error in &errors {
        eprintln!("  {error}");
    }
    exit_codes::ERROR
}

fn redacted(mut config: AppConfig) -> AppConfig {
    if config.pagespeed.api_key.is_some() {
        config.pagespeed.api_key = Some(REDACTED.to_string());
    }
    if config.ai.api_key.is_some() {
        config.ai.api_key = Some(REDACTED.to_string());
    }
    config
}
