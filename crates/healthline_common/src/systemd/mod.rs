//! Systemd unit source
//!
//! Watches an explicit list of units and, optionally, every unit the
//! service manager currently reports as failed.

mod classify;
mod fact;
mod provider;

pub use classify::{build_report, classify_unit, strip_unit_suffix, SOURCE_TITLE, UNIT_SUFFIXES};
pub use fact::{UnitFact, UnitListing};
pub use provider::{
    parse_failed_units, parse_show_output, SystemctlProvider, UnitProvider, UNIT_PROPERTIES,
};

use crate::error::ProbeError;
use crate::status::{SourceReport, Tier};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// Validated settings for the systemd source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitSourceConfig {
    /// Units to watch explicitly
    pub units: Vec<String>,
    /// Also report every currently failed unit
    pub show_failed: bool,
    /// A unit that exited 0 and is no longer running counts as Good
    pub inactive_ok: bool,
    /// Hide Good units; an all-Good source shows only its header
    pub failed_only: bool,
    /// Strip unit type suffixes from display names
    pub hide_ext: bool,
    /// Keep read-error notes when `failed_only` collapses the report
    pub notes_when_collapsed: bool,
}

impl UnitSourceConfig {
    /// Nothing requested and no failed-unit discovery
    pub fn is_unconfigured(&self) -> bool {
        self.units.is_empty() && !self.show_failed
    }
}

/// Produce the systemd section. Never fails: provider errors and timeouts
/// degrade to a header-only report.
pub async fn collect<P: UnitProvider>(
    provider: &P,
    config: &UnitSourceConfig,
    timeout: Duration,
) -> SourceReport {
    if config.is_unconfigured() {
        return degraded_report(&ProbeError::Misconfigured);
    }

    let lookup = provider.list_units(&config.units, config.show_failed);
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(listing)) => build_report(listing, config),
        Ok(Err(err)) => {
            warn!("Systemd source degraded: {}", err);
            degraded_report(&err)
        }
        Err(_) => {
            let err = ProbeError::Timeout(timeout);
            warn!("Systemd source degraded: {}", err);
            degraded_report(&err)
        }
    }
}

/// Header-only report for a source-wide failure
pub fn degraded_report(err: &ProbeError) -> SourceReport {
    match err {
        ProbeError::Misconfigured => {
            SourceReport::header_only(SOURCE_TITLE, Tier::Warning, "unconfigured")
        }
        ProbeError::NoFactsFound => {
            SourceReport::header_only(SOURCE_TITLE, Tier::Warning, "Unavailable")
        }
        ProbeError::ProviderUnavailable { .. }
        | ProbeError::Timeout(_)
        | ProbeError::ItemRead { .. } => {
            SourceReport::header_only(SOURCE_TITLE, Tier::Critical, "unavailable")
        }
    }
}
