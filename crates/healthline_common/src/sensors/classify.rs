//! Threshold classification for CPU temperatures

use super::discovery::{SensorNaming, SensorReading};
use super::SensorSourceConfig;
use crate::error::ProbeError;
use crate::status::{sort_items, Item, SourceReport, Tier};
use serde::Serialize;

pub const SOURCE_TITLE: &str = "CPU temp";

/// Warning and critical thresholds in whole degrees, `warn <= crit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub warn: i64,
    pub crit: i64,
}

/// Each threshold is the inclusive lower bound of its tier
pub fn classify_reading(celsius: i64, thresholds: Thresholds) -> Tier {
    if celsius >= thresholds.crit {
        Tier::Critical
    } else if celsius >= thresholds.warn {
        Tier::Warning
    } else {
        Tier::Good
    }
}

pub fn display_name(key: &str, naming: SensorNaming) -> String {
    match naming {
        SensorNaming::Core => format!("Core {}", key),
        SensorNaming::Vendor => key.to_string(),
    }
}

/// Reduce discovered readings to the CPU temperature section
pub fn build_report(
    naming: SensorNaming,
    readings: &[SensorReading],
    errors: &[ProbeError],
    config: &SensorSourceConfig,
) -> SourceReport {
    let mut items: Vec<Item> = readings
        .iter()
        .map(|reading| {
            let tier = classify_reading(reading.celsius, config.thresholds);
            Item::new(reading.key.clone(), tier, reading.celsius.to_string())
                .with_display_name(display_name(&reading.key, naming))
        })
        .collect();
    sort_items(&mut items);

    // Critical readings count as warnings too; critical wins the label
    let warn_count = items.iter().filter(|item| !item.tier.is_good()).count();
    let crit_count = items
        .iter()
        .filter(|item| item.tier == Tier::Critical)
        .count();

    let (tier, label) = if warn_count == 0 {
        (Tier::Good, "OK")
    } else if crit_count > 0 {
        (Tier::Critical, "Critical")
    } else {
        (Tier::Warning, "Warning")
    };

    if config.failed_only {
        items.retain(|item| !item.tier.is_good());
    }

    let notes = errors.iter().map(ToString::to_string).collect();
    SourceReport::new(SOURCE_TITLE, tier, label, items, notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: Thresholds = Thresholds { warn: 70, crit: 85 };

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(classify_reading(69, LIMITS), Tier::Good);
        assert_eq!(classify_reading(70, LIMITS), Tier::Warning);
        assert_eq!(classify_reading(84, LIMITS), Tier::Warning);
        assert_eq!(classify_reading(85, LIMITS), Tier::Critical);
        assert_eq!(classify_reading(-5, LIMITS), Tier::Good);
    }

    #[test]
    fn test_equal_thresholds_skip_warning() {
        let limits = Thresholds { warn: 80, crit: 80 };
        assert_eq!(classify_reading(79, limits), Tier::Good);
        assert_eq!(classify_reading(80, limits), Tier::Critical);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("3", SensorNaming::Core), "Core 3");
        assert_eq!(display_name("tctl", SensorNaming::Vendor), "tctl");
    }
}
