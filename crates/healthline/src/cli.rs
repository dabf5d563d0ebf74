//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution so the surface can be
//! tested without running any source.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// healthline CLI
#[derive(Parser, Debug)]
#[command(name = "healthline")]
#[command(about = "Host health summary for login banners", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides $HEALTHLINE_CONFIG and the default locations)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// When to color the report
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Output JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Only show items that are not Good, on every source
    #[arg(long, global = true)]
    pub failed_only: bool,

    /// Per-source timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Subcommand (if not provided, prints the report)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Print the effective configuration as YAML
    Config,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve against whether the terminal supports color
    pub fn enabled(self, terminal_colors: bool) -> bool {
        match self {
            ColorChoice::Auto => terminal_colors,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_color_choice() {
        assert!(ColorChoice::Auto.enabled(true));
        assert!(!ColorChoice::Auto.enabled(false));
        assert!(ColorChoice::Always.enabled(false));
        assert!(!ColorChoice::Never.enabled(true));
    }
}
