//! CPU temperature source

mod classify;
mod discovery;
mod provider;

pub use classify::{build_report, classify_reading, display_name, Thresholds, SOURCE_TITLE};
pub use discovery::{discover, errors_for, sensor_key, RawSample, SensorNaming, SensorReading};
pub use provider::{
    parse_sensors_output, HwmonProvider, LmSensorsProvider, SampleSet, SensorProvider, HWMON_ROOT,
};

use crate::error::ProbeError;
use crate::status::{SourceReport, Tier};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Validated settings for the CPU temperature source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorSourceConfig {
    pub thresholds: Thresholds,
    /// Hide Good readings. The header is computed the same either way.
    pub failed_only: bool,
}

/// Produce the CPU temperature section. Never fails.
pub async fn collect<P: SensorProvider>(
    provider: &P,
    config: &SensorSourceConfig,
    timeout: Duration,
) -> SourceReport {
    let set = match tokio::time::timeout(timeout, provider.read_samples()).await {
        Ok(Ok(set)) => set,
        Ok(Err(err)) => {
            warn!("CPU temp source degraded: {}", err);
            return degraded_report(&err);
        }
        Err(_) => {
            let err = ProbeError::Timeout(timeout);
            warn!("CPU temp source degraded: {}", err);
            return degraded_report(&err);
        }
    };

    match discover(&set.samples) {
        Some((naming, readings)) => {
            debug!("Discovered {} CPU readings ({:?} naming)", readings.len(), naming);
            let errors = errors_for(naming, set.errors);
            build_report(naming, &readings, &errors, config)
        }
        None => degraded_report(&ProbeError::NoFactsFound),
    }
}

/// Header-only report for a source-wide failure
pub fn degraded_report(err: &ProbeError) -> SourceReport {
    match err {
        ProbeError::NoFactsFound => {
            SourceReport::header_only(SOURCE_TITLE, Tier::Warning, "Unavailable")
        }
        ProbeError::ProviderUnavailable { .. }
        | ProbeError::Misconfigured
        | ProbeError::ItemRead { .. } => {
            SourceReport::header_only(SOURCE_TITLE, Tier::Warning, "unavailable")
        }
        ProbeError::Timeout(_) => {
            SourceReport::header_only(SOURCE_TITLE, Tier::Critical, "unavailable")
        }
    }
}
