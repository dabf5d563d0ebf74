//! Picking CPU readings out of the raw sensor keys
//!
//! Keys follow the `{chip}_{label}_input` scheme, with the label lowercased
//! and spaces removed (`coretemp_core0_input`, `k10temp_tctl_input`).

use crate::error::ProbeError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Intel per-core readings
static CORE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^coretemp_core(\d+)_input$").expect("valid core key pattern"));

/// AMD control/die/CCD readings
static VENDOR_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^k10temp_(tctl|tdie|tccd\d+)_input$").expect("valid vendor key pattern")
});

/// One temperature as read from the hardware, before discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    pub key: String,
    pub celsius: i64,
}

impl RawSample {
    pub fn new(key: impl Into<String>, celsius: i64) -> Self {
        Self {
            key: key.into(),
            celsius,
        }
    }
}

/// How the readings of a set are named on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorNaming {
    /// Numbered cores, shown as `Core {key}`
    Core,
    /// Vendor channel names, shown verbatim
    Vendor,
}

impl SensorNaming {
    fn pattern(self) -> &'static Regex {
        match self {
            SensorNaming::Core => &*CORE_KEY,
            SensorNaming::Vendor => &*VENDOR_KEY,
        }
    }

    /// Whether a raw key belongs to this family of readings
    pub fn owns_key(self, key: &str) -> bool {
        self.pattern().is_match(key)
    }
}

/// A CPU temperature that survived discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorReading {
    pub key: String,
    pub celsius: i64,
}

impl SensorReading {
    pub fn new(key: impl Into<String>, celsius: i64) -> Self {
        Self {
            key: key.into(),
            celsius,
        }
    }
}

fn extract(samples: &[RawSample], pattern: &Regex) -> Vec<SensorReading> {
    samples
        .iter()
        .filter_map(|sample| {
            let caps = pattern.captures(&sample.key)?;
            Some(SensorReading::new(caps.get(1)?.as_str(), sample.celsius))
        })
        .collect()
}

/// Per-core readings if there are any, else vendor readings, else `None`
pub fn discover(samples: &[RawSample]) -> Option<(SensorNaming, Vec<SensorReading>)> {
    [SensorNaming::Core, SensorNaming::Vendor]
        .into_iter()
        .map(|naming| (naming, extract(samples, naming.pattern())))
        .find(|(_, readings)| !readings.is_empty())
}

/// Read errors for channels of the discovered family. Failures on other
/// chips (disks, ACPI zones) are not items of this source and are dropped.
pub fn errors_for(naming: SensorNaming, errors: Vec<ProbeError>) -> Vec<ProbeError> {
    errors
        .into_iter()
        .filter(|err| match err {
            ProbeError::ItemRead { name, .. } => naming.owns_key(name),
            _ => true,
        })
        .collect()
}

/// Build a sensor key from a chip name and a channel label
pub fn sensor_key(chip: &str, label: &str) -> String {
    let label: String = label
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect();
    format!("{}_{}_input", chip, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_key() {
        assert_eq!(sensor_key("coretemp", "Core 0"), "coretemp_core0_input");
        assert_eq!(sensor_key("k10temp", "Tctl"), "k10temp_tctl_input");
        assert_eq!(sensor_key("nvme", "Composite"), "nvme_composite_input");
    }

    #[test]
    fn test_discover_prefers_cores() {
        let samples = vec![
            RawSample::new("coretemp_packageid0_input", 50),
            RawSample::new("coretemp_core0_input", 45),
            RawSample::new("coretemp_core1_input", 47),
            RawSample::new("k10temp_tctl_input", 60),
        ];
        let (naming, readings) = discover(&samples).unwrap();
        assert_eq!(naming, SensorNaming::Core);
        assert_eq!(
            readings,
            vec![SensorReading::new("0", 45), SensorReading::new("1", 47)]
        );
    }

    #[test]
    fn test_discover_falls_back_to_vendor() {
        let samples = vec![
            RawSample::new("k10temp_tctl_input", 61),
            RawSample::new("k10temp_tccd1_input", 55),
            RawSample::new("nvme_composite_input", 38),
        ];
        let (naming, readings) = discover(&samples).unwrap();
        assert_eq!(naming, SensorNaming::Vendor);
        assert_eq!(readings.len(), 2);
        assert!(readings.contains(&SensorReading::new("tctl", 61)));
        assert!(readings.contains(&SensorReading::new("tccd1", 55)));
    }

    #[test]
    fn test_errors_for_keeps_discovered_family() {
        let errors = vec![
            ProbeError::item_read("coretemp_core1_input", "I/O error"),
            ProbeError::item_read("nvme_composite_input", "I/O error"),
            ProbeError::item_read("thinkpad_cpu_input", "reading not available"),
            ProbeError::item_read("k10temp_tctl_input", "I/O error"),
        ];

        let kept: Vec<String> = errors_for(SensorNaming::Core, errors)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(kept, vec!["Failed to read coretemp_core1_input: I/O error"]);

        let vendor = errors_for(
            SensorNaming::Vendor,
            vec![
                ProbeError::item_read("coretemp_core1_input", "I/O error"),
                ProbeError::item_read("k10temp_tdie_input", "I/O error"),
            ],
        );
        assert_eq!(vendor.len(), 1);
        assert!(vendor[0].to_string().contains("k10temp_tdie_input"));
    }

    #[test]
    fn test_discover_nothing() {
        let samples = vec![RawSample::new("acpitz_temp1_input", 30)];
        assert!(discover(&samples).is_none());
        assert!(discover(&[]).is_none());
    }
}
