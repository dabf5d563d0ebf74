//! CLI integration tests for healthline
//!
//! Tests the CLI surface:
//! - healthline                  text report
//! - healthline --json           JSON report
//! - healthline --failed-only    forced on every source
//! - healthline config           effective configuration as YAML

use clap::Parser;
use healthline::app::{apply_overrides, format_reports, OutputMode};
use healthline::cli::{Cli, ColorChoice, Commands};
use healthline_common::{Config, SourceReport, Tier};
use std::path::{Path, PathBuf};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("healthline").chain(args.iter().copied())).unwrap()
}

fn sample_reports() -> Vec<SourceReport> {
    vec![
        SourceReport::header_only("Systemd", Tier::Good, "OK"),
        SourceReport::header_only("CPU temp", Tier::Warning, "Unavailable"),
    ]
}

#[test]
fn test_defaults() {
    let cli = parse(&[]);
    assert_eq!(cli.color, ColorChoice::Auto);
    assert!(!cli.json);
    assert!(!cli.failed_only);
    assert!(cli.timeout_ms.is_none());
    assert!(cli.config.is_none());
    assert!(cli.command.is_none());
}

#[test]
fn test_all_flags() {
    let cli = parse(&[
        "--config",
        "/tmp/healthline.yaml",
        "--color",
        "never",
        "--json",
        "--failed-only",
        "--timeout-ms",
        "250",
    ]);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/healthline.yaml")));
    assert_eq!(cli.color, ColorChoice::Never);
    assert!(cli.json);
    assert!(cli.failed_only);
    assert_eq!(cli.timeout_ms, Some(250));
}

#[test]
fn test_config_subcommand_accepts_global_flags() {
    let cli = parse(&["config", "--failed-only"]);
    assert_eq!(cli.command, Some(Commands::Config));
    assert!(cli.failed_only);
}

#[test]
fn test_invalid_values_rejected() {
    assert!(Cli::try_parse_from(["healthline", "--color", "sometimes"]).is_err());
    assert!(Cli::try_parse_from(["healthline", "--timeout-ms", "soon"]).is_err());
    assert!(Cli::try_parse_from(["healthline", "status"]).is_err());
}

#[test]
fn test_failed_only_beats_per_source_settings() {
    let mut config = Config::default();
    config.systemd.failed_only = Some(false);

    apply_overrides(&mut config, &parse(&["--failed-only", "--timeout-ms", "100"]));

    assert!(config.unit_source().failed_only);
    assert!(config.sensor_source().failed_only);
    assert_eq!(config.timeout_ms, 100);
}

#[test]
fn test_no_flags_leave_config_alone() {
    let mut config = Config::default();
    apply_overrides(&mut config, &parse(&[]));
    assert_eq!(config, Config::default());
}

#[test]
fn test_text_output() {
    let out = format_reports(
        &sample_reports(),
        &Config::default(),
        OutputMode::Text { color: false },
    )
    .unwrap();
    assert_eq!(out, "Systemd:   OK\nCPU temp:  Unavailable\n");
}

#[test]
fn test_json_output() {
    let out = format_reports(&sample_reports(), &Config::default(), OutputMode::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    let sections = value.as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["title"], "Systemd");
    assert_eq!(sections[0]["header_tier"], "good");
    assert_eq!(sections[1]["header_label"], "Unavailable");
    assert_eq!(sections[1]["items"].as_array().unwrap().len(), 0);
}

#[test]
fn test_json_ignores_color_choice() {
    let cli = parse(&["--json", "--color", "always"]);
    assert_eq!(OutputMode::from_cli(&cli), OutputMode::Json);

    let cli = parse(&["--color", "always"]);
    assert_eq!(OutputMode::from_cli(&cli), OutputMode::Text { color: true });
}

#[test]
fn test_effective_config_yaml_reloads() {
    let mut config = Config::default();
    apply_overrides(&mut config, &parse(&["--failed-only"]));

    let yaml = config.to_yaml().unwrap();
    let reloaded = Config::from_yaml(&yaml, Path::new("effective.yaml")).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_config_file_flag_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "timeout_ms: 1200\ncpu_temp:\n  warn: 60\n  crit: 80\n").unwrap();

    let cli = parse(&["--config", path.to_str().unwrap()]);
    let config = Config::load_with(cli.config.as_deref(), |_: &str| None).unwrap();
    assert_eq!(config.timeout_ms, 1200);
    assert_eq!(config.cpu_temp.warn, 60);
}
