//! Command execution
//!
//! Loads the configuration, folds in CLI overrides, runs every enabled source
//! and writes the document to stdout. Unhealthy sources are part of a
//! successful run; only configuration and output errors fail the process.

use crate::cli::{Cli, Commands};
use crate::logging;
use anyhow::{Context, Result};
use healthline_common::{run_all, tasks_from_config, Config, Presentation, SourceReport};
use std::io::Write;
use tracing::{debug, info};

/// How the report is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text { color: bool },
    Json,
}

impl OutputMode {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputMode::Json
        } else {
            OutputMode::Text {
                color: cli.color.enabled(console::colors_enabled()),
            }
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let logging_ready = logging::init_from_env();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    config
        .validate()
        .context("Invalid configuration after command-line overrides")?;

    if !logging_ready {
        logging::init(&config.log.level);
        // Config::load ran before any subscriber existed
        match Config::locate(cli.config.as_deref(), |var| std::env::var(var).ok()) {
            Some(path) => info!("Loaded config from {}", path.display()),
            None => debug!("No config file found, using defaults"),
        }
    }

    let output = match cli.command {
        Some(Commands::Config) => config.to_yaml().context("Failed to serialize configuration")?,
        None => {
            let tasks = tasks_from_config(&config);
            info!("Collecting {} sources", tasks.len());
            let reports = run_all(tasks).await;
            format_reports(&reports, &config, OutputMode::from_cli(&cli))?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write report")?;
    Ok(())
}

/// Command-line flags beat both the file and the environment.
/// `--failed-only` also beats per-source settings.
pub fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.failed_only {
        config.failed_only = true;
        config.systemd.failed_only = Some(true);
        config.cpu_temp.failed_only = Some(true);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
}

/// Render the finished reports
pub fn format_reports(reports: &[SourceReport], config: &Config, mode: OutputMode) -> Result<String> {
    match mode {
        OutputMode::Json => {
            let mut json =
                serde_json::to_string_pretty(reports).context("Failed to serialize reports")?;
            json.push('\n');
            Ok(json)
        }
        OutputMode::Text { color } => {
            Ok(Presentation::new(&config.presentation, color).render_document(reports))
        }
    }
}
