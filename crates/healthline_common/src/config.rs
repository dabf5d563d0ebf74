//! healthline configuration
//!
//! Configuration is a YAML file, looked up in this order:
//! 1. `$HEALTHLINE_CONFIG` (explicit override, must exist)
//! 2. `$XDG_CONFIG_HOME/healthline/config.yaml`
//! 3. `~/.config/healthline/config.yaml`
//! 4. `/etc/healthline/config.yaml`
//!
//! A missing file means built-in defaults. A handful of `HEALTHLINE_*`
//! environment variables override file values, then the result is validated
//! once. Sources only ever see the validated per-source settings.

use crate::error::ConfigError;
use crate::sensors::{SensorSourceConfig, Thresholds, HWMON_ROOT};
use crate::systemd::UnitSourceConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// System configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/healthline";
const CONFIG_FILE: &str = "config.yaml";

pub const ENV_CONFIG: &str = "HEALTHLINE_CONFIG";
pub const ENV_FAILED_ONLY: &str = "HEALTHLINE_FAILED_ONLY";
pub const ENV_TIMEOUT_MS: &str = "HEALTHLINE_TIMEOUT_MS";
pub const ENV_SYSTEMD_UNITS: &str = "HEALTHLINE_SYSTEMD_UNITS";
pub const ENV_CPU_WARN: &str = "HEALTHLINE_CPU_WARN";
pub const ENV_CPU_CRIT: &str = "HEALTHLINE_CPU_CRIT";

/// A section of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Systemd,
    CpuTemp,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Systemd => "systemd",
            SourceKind::CpuTemp => "cpu_temp",
        }
    }
}

/// Where CPU temperatures come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SensorBackend {
    /// Read the hwmon tree directly
    #[default]
    Sysfs,
    /// Parse the output of `sensors`
    Exec,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Column layout, `[left indent, gap after the longest name]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "default_header_pad")]
    pub header_pad: [usize; 2],

    #[serde(default = "default_content_pad")]
    pub content_pad: [usize; 2],
}

fn default_header_pad() -> [usize; 2] {
    [0, 2]
}

fn default_content_pad() -> [usize; 2] {
    [2, 1]
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            header_pad: default_header_pad(),
            content_pad: default_content_pad(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Systemd section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemdConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Falls back to the top-level `failed_only` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_only: Option<bool>,

    #[serde(default)]
    pub units: Vec<String>,

    #[serde(default)]
    pub hide_ext: bool,

    #[serde(default)]
    pub inactive_ok: bool,

    #[serde(default)]
    pub show_failed: bool,

    #[serde(default)]
    pub notes_when_collapsed: bool,
}

impl Default for SystemdConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            failed_only: None,
            units: Vec::new(),
            hide_ext: false,
            inactive_ok: false,
            show_failed: false,
            notes_when_collapsed: false,
        }
    }
}

/// CPU temperature section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTempConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_only: Option<bool>,

    /// Warning threshold in °C (inclusive)
    #[serde(default = "default_cpu_warn")]
    pub warn: i64,

    /// Critical threshold in °C (inclusive)
    #[serde(default = "default_cpu_crit")]
    pub crit: i64,

    #[serde(default)]
    pub backend: SensorBackend,

    #[serde(default = "default_hwmon_root")]
    pub hwmon_root: PathBuf,
}

fn default_cpu_warn() -> i64 {
    70
}

fn default_cpu_crit() -> i64 {
    90
}

fn default_hwmon_root() -> PathBuf {
    PathBuf::from(HWMON_ROOT)
}

impl Default for CpuTempConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            failed_only: None,
            warn: default_cpu_warn(),
            crit: default_cpu_crit(),
            backend: SensorBackend::default(),
            hwmon_root: default_hwmon_root(),
        }
    }
}

/// Complete healthline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default for every source's `failed_only`
    #[serde(default)]
    pub failed_only: bool,

    /// Upper bound for each source's fact gathering
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Order of sections in the report
    #[serde(default = "default_show_order")]
    pub show_order: Vec<SourceKind>,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub presentation: PresentationConfig,

    #[serde(default)]
    pub systemd: SystemdConfig,

    #[serde(default)]
    pub cpu_temp: CpuTempConfig,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_show_order() -> Vec<SourceKind> {
    vec![SourceKind::Systemd, SourceKind::CpuTemp]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            failed_only: false,
            timeout_ms: default_timeout_ms(),
            show_order: default_show_order(),
            log: LogConfig::default(),
            presentation: PresentationConfig::default(),
            systemd: SystemdConfig::default(),
            cpu_temp: CpuTempConfig::default(),
        }
    }
}

impl Config {
    /// Load, apply environment overrides and validate, using the process
    /// environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, |var| std::env::var(var).ok())
    }

    /// Same as [`Config::load`] with an injectable environment
    pub fn load_with<F>(explicit: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = Self::locate(explicit, &env);

        let mut config = match &path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(&env)?;
        config.validate()?;
        Ok(config)
    }

    /// The file `load_with` would read, if any
    pub fn locate<F>(explicit: Option<&Path>, env: F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_path(env),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Apply `HEALTHLINE_*` overrides
    pub fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env(ENV_FAILED_ONLY) {
            self.failed_only = parse_bool(ENV_FAILED_ONLY, &value)?;
        }
        if let Some(value) = env(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_number(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = env(ENV_SYSTEMD_UNITS) {
            self.systemd.units = value
                .split(',')
                .map(str::trim)
                .filter(|unit| !unit.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(value) = env(ENV_CPU_WARN) {
            self.cpu_temp.warn = parse_number(ENV_CPU_WARN, &value)?;
        }
        if let Some(value) = env(ENV_CPU_CRIT) {
            self.cpu_temp.crit = parse_number(ENV_CPU_CRIT, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cpu_temp.warn > self.cpu_temp.crit {
            return Err(ConfigError::Thresholds {
                warn: self.cpu_temp.warn,
                crit: self.cpu_temp.crit,
            });
        }

        let mut seen = HashSet::new();
        for kind in &self.show_order {
            if !seen.insert(kind) {
                return Err(ConfigError::DuplicateSource(kind.as_str().to_string()));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Sources to run, in report order
    pub fn enabled_sources(&self) -> Vec<SourceKind> {
        self.show_order
            .iter()
            .copied()
            .filter(|kind| match kind {
                SourceKind::Systemd => self.systemd.enabled,
                SourceKind::CpuTemp => self.cpu_temp.enabled,
            })
            .collect()
    }

    pub fn unit_source(&self) -> UnitSourceConfig {
        UnitSourceConfig {
            units: self.systemd.units.clone(),
            show_failed: self.systemd.show_failed,
            inactive_ok: self.systemd.inactive_ok,
            failed_only: self.systemd.failed_only.unwrap_or(self.failed_only),
            hide_ext: self.systemd.hide_ext,
            notes_when_collapsed: self.systemd.notes_when_collapsed,
        }
    }

    pub fn sensor_source(&self) -> SensorSourceConfig {
        SensorSourceConfig {
            thresholds: Thresholds {
                warn: self.cpu_temp.warn,
                crit: self.cpu_temp.crit,
            },
            failed_only: self.cpu_temp.failed_only.unwrap_or(self.failed_only),
        }
    }
}

/// Find the config file. `$HEALTHLINE_CONFIG` is returned even if it does
/// not exist so that a typo is reported instead of silently ignored.
pub fn discover_path<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = env(ENV_CONFIG) {
        return Some(PathBuf::from(path));
    }

    let mut candidates = Vec::new();
    if let Some(xdg) = env("XDG_CONFIG_HOME") {
        candidates.push(PathBuf::from(xdg).join("healthline").join(CONFIG_FILE));
    }
    if let Some(home) = env("HOME") {
        candidates.push(
            PathBuf::from(home)
                .join(".config")
                .join("healthline")
                .join(CONFIG_FILE),
        );
    }
    candidates.push(PathBuf::from(SYSTEM_CONFIG_DIR).join(CONFIG_FILE));

    candidates.into_iter().find(|path| path.exists())
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Env {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        var,
        value: value.to_string(),
    })
}
