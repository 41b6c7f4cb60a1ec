//! perfally: web performance, SEO and accessibility audits with
//! remediation plans and client-ready reports.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use perfally::{
    cli::{self, ConfigAction, PlanFormat},
    config::{AppConfig, Validatable},
    model::{PlanTier, Strategy},
    pagespeed::PageSpeedClient,
    pipeline::{exit_codes, should_use_color, AuditRequest, OutputTarget, ReportRequest},
    planner::AiPlanner,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "perfally")]
#[command(version)]
#[command(about = "Web performance, SEO and accessibility audits with remediation plans", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  The audit service failed or was unreachable
    2  The subscription plan does not include the request
    3  Invalid input, configuration or other error")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a fresh audit of one URL and save the snapshot
    Audit {
        /// Page to audit; https:// is assumed when no scheme is given
        url: String,

        /// Device profile to emulate (default from config)
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Subscription plan of the account
        #[arg(long, value_enum, default_value = "free")]
        plan: PlanTier,

        /// AI plans already generated this month
        #[arg(long, default_value_t = 0)]
        ai_used: u32,

        /// Write the snapshot to a file instead of stdout
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Print the action plan for a stored audit snapshot
    Plan {
        /// Path to the snapshot JSON
        snapshot: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: PlanFormat,

        /// Write to a file instead of stdout
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Render a paginated report for a project
    Report {
        /// Path to the project JSON
        project: PathBuf,

        /// Output format (default from config)
        #[arg(short, long, value_enum)]
        output: Option<ReportFormat>,

        /// Write to a file instead of stdout
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,

        /// Subscription plan of the account
        #[arg(long, value_enum, default_value = "free")]
        plan: PlanTier,

        /// Fixed generation time (RFC 3339) for reproducible output
        #[arg(long, value_parser = parse_timestamp)]
        generated_at: Option<DateTime<Utc>>,
    },

    /// Show, check or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match cli.command {
        Commands::Audit {
            ref url,
            strategy,
            plan,
            ai_used,
            ref output_file,
        } => {
            let Some(config) = load_valid_config(&cli)? else {
                return Ok(exit_codes::ERROR);
            };
            let service = match PageSpeedClient::new(config.pagespeed.to_client_config()) {
                Ok(service) => service,
                Err(e) => {
                    tracing::error!("{}", e);
                    return Ok(exit_codes::AUDIT_FAILED);
                }
            };
            let planner = AiPlanner::from_config(&config.ai);
            let request = AuditRequest::new(
                url.clone(),
                strategy.unwrap_or(config.pagespeed.strategy),
                plan,
            )
            .with_ai_plans_used(ai_used);
            cli::run_audit(
                &service,
                &planner,
                &request,
                &OutputTarget::from_option(output_file.clone()),
            )
        }

        Commands::Plan {
            snapshot,
            output,
            output_file,
        } => cli::run_plan(&snapshot, output, &OutputTarget::from_option(output_file)),

        Commands::Report {
            ref project,
            output,
            ref output_file,
            plan,
            generated_at,
        } => {
            let Some(config) = load_valid_config(&cli)? else {
                return Ok(exit_codes::ERROR);
            };
            let target = OutputTarget::from_option(output_file.clone());
            let mut request =
                ReportRequest::new(output.unwrap_or(config.report.format), plan);
            request.generated_at = generated_at;
            request.color = should_use_color(cli.no_color, &target);
            cli::run_report(project, &request, &config.report, &target)
        }

        Commands::Config { action } => cli::run_config(&action, cli.config.as_deref()),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "perfally", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Load the effective configuration; `None` when it fails validation.
fn load_valid_config(cli: &Cli) -> Result<Option<AppConfig>> {
    if let Some(path) = &cli.config {
        // An explicit path that does not exist is an error, not a fallback
        perfally::config::load_config_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }
    let (config, loaded_from) = AppConfig::load(cli.config.as_deref());
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(Some(config));
    }
    for error in &errors {
        tracing::error!("Invalid configuration: {}", error);
    }
    Ok(None)
}
