//! Temperature readings from the hardware
//!
//! Two backends: the kernel hwmon tree in sysfs, or the lm_sensors
//! `sensors` command. Both produce `{chip}_{label}_input` keys.
//! Citation: [archwiki:Lm_sensors]

use super::discovery::{sensor_key, RawSample};
use crate::error::ProbeError;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

/// Default location of the kernel hwmon class
pub const HWMON_ROOT: &str = "/sys/class/hwmon";

/// Everything a sensor provider read in one run
#[derive(Debug, Default)]
pub struct SampleSet {
    pub samples: Vec<RawSample>,
    /// Channels that exist but could not be read
    pub errors: Vec<ProbeError>,
}

/// Source of raw temperature samples
pub trait SensorProvider {
    /// Read every temperature channel. An `Err` means no sensor data could be
    /// reached at all.
    fn read_samples(&self) -> impl Future<Output = Result<SampleSet, ProbeError>> + Send;
}

fn unavailable(reason: impl ToString) -> ProbeError {
    ProbeError::ProviderUnavailable {
        provider: "sensors",
        reason: reason.to_string(),
    }
}

/// Reads `temp*_input` files below the hwmon class directory
#[derive(Debug, Clone)]
pub struct HwmonProvider {
    root: PathBuf,
}

impl Default for HwmonProvider {
    fn default() -> Self {
        Self {
            root: PathBuf::from(HWMON_ROOT),
        }
    }
}

impl HwmonProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    async fn read_chip(chip_dir: &Path, chip: &str, set: &mut SampleSet) {
        let entries = match Self::sorted_entries(chip_dir).await {
            Ok(entries) => entries,
            Err(err) => {
                set.errors.push(ProbeError::item_read(chip, err));
                return;
            }
        };

        for path in entries {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(channel) = file_name
                .strip_suffix("_input")
                .filter(|c| c.starts_with("temp"))
            else {
                continue;
            };

            let label_path = chip_dir.join(format!("{}_label", channel));
            let label = tokio::fs::read_to_string(&label_path)
                .await
                .map(|l| l.trim().to_string())
                .unwrap_or_else(|_| channel.to_string());
            let key = sensor_key(chip, &label);

            match read_millidegrees(&path).await {
                Ok(milli) => set.samples.push(RawSample::new(key, milli / 1000)),
                Err(reason) => {
                    warn!("Failed to read {}: {}", path.display(), reason);
                    set.errors.push(ProbeError::item_read(key, reason));
                }
            }
        }
    }
}

async fn read_millidegrees(path: &Path) -> Result<i64, String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| e.to_string())?;
    content
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid reading {:?}: {}", content.trim(), e))
}

impl SensorProvider for HwmonProvider {
    async fn read_samples(&self) -> Result<SampleSet, ProbeError> {
        let chips = Self::sorted_entries(&self.root)
            .await
            .map_err(|e| unavailable(format!("{}: {}", self.root.display(), e)))?;

        let mut set = SampleSet::default();
        for chip_dir in chips {
            // Entries without a name file are not sensor chips
            let Ok(name) = tokio::fs::read_to_string(chip_dir.join("name")).await else {
                continue;
            };
            Self::read_chip(&chip_dir, name.trim(), &mut set).await;
        }

        debug!(
            "Read {} hwmon samples ({} errors)",
            set.samples.len(),
            set.errors.len()
        );
        Ok(set)
    }
}

/// Runs the lm_sensors `sensors` command and parses its text output
#[derive(Debug, Clone)]
pub struct LmSensorsProvider {
    program: String,
}

impl Default for LmSensorsProvider {
    fn default() -> Self {
        Self {
            program: "sensors".to_string(),
        }
    }
}

impl LmSensorsProvider {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SensorProvider for LmSensorsProvider {
    async fn read_samples(&self) -> Result<SampleSet, ProbeError> {
        let output = Command::new(&self.program)
            .env("LC_ALL", "C.UTF-8")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| unavailable(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unavailable(stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_sensors_output(&stdout))
    }
}

/// Parse `sensors` output.
///
/// Blocks start with a chip line (`coretemp-isa-0000`) followed by
/// `Label: +45.0°C ...` lines; the chip name is the part before the first
/// dash. Channels showing `N/A` are reported as read errors.
pub fn parse_sensors_output(output: &str) -> SampleSet {
    let mut set = SampleSet::default();
    let mut chip: Option<String> = None;

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            chip = None;
            continue;
        }

        let Some((label, value)) = trimmed.split_once(':') else {
            if chip.is_none() {
                let name = trimmed.split('-').next().unwrap_or(trimmed);
                chip = Some(name.to_string());
            }
            continue;
        };

        let Some(chip) = chip.as_deref() else {
            continue;
        };
        if label == "Adapter" {
            continue;
        }

        let key = sensor_key(chip, label);
        if value.trim_start().starts_with("N/A") {
            set.errors
                .push(ProbeError::item_read(key, "reading not available"));
            continue;
        }
        if let Some(celsius) = extract_celsius(value) {
            set.samples.push(RawSample::new(key, celsius));
        }
    }

    set
}

/// First `+45.0°C` style token, truncated to whole degrees
fn extract_celsius(value: &str) -> Option<i64> {
    value
        .split_whitespace()
        .find(|part| part.contains("°C"))
        .and_then(|part| {
            part.replace("°C", "")
                .replace('+', "")
                .parse::<f64>()
                .ok()
        })
        .map(|temp| temp.trunc() as i64)
}
