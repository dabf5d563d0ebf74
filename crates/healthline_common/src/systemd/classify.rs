//! Unit-state classification and the systemd aggregate rule

use super::fact::{UnitFact, UnitListing};
use super::UnitSourceConfig;
use crate::status::{sort_items, Item, SourceReport, Tier, TierCounts};
use tracing::debug;

pub const SOURCE_TITLE: &str = "Systemd";

/// Unit type suffixes removed from display names when `hide_ext` is set
pub const UNIT_SUFFIXES: &[&str] = &[
    ".service",
    ".socket",
    ".device",
    ".mount",
    ".automount",
    ".swap",
    ".target",
    ".path",
    ".timer",
    ".slice",
    ".scope",
];

const UNKNOWN: &str = "unknown";

/// Classify one unit. Empty facts are not classified at all.
pub fn classify_unit(fact: &UnitFact, inactive_ok: bool) -> Option<Item> {
    if fact.is_empty() {
        return None;
    }

    let field = |value: &Option<String>| value.as_deref().unwrap_or(UNKNOWN).to_string();
    let active = fact.active_state.as_deref();

    let (tier, label) = if fact.load_state.as_deref() != Some("loaded") {
        // Unit file missing, masked or broken
        (Tier::Critical, field(&fact.load_state))
    } else if active == Some("active") {
        (Tier::Good, field(&fact.active_state))
    } else if fact.exec_main_status.as_deref() == Some("0") {
        if inactive_ok {
            (Tier::Good, field(&fact.result))
        } else {
            (Tier::Warning, field(&fact.active_state))
        }
    } else {
        (Tier::Critical, field(&fact.active_state))
    };

    Some(Item::new(fact.name.clone(), tier, label))
}

/// Strip one trailing unit type suffix. Names without a known suffix, or
/// consisting only of a suffix, are returned unchanged.
pub fn strip_unit_suffix<'a>(name: &'a str, suffixes: &[&str]) -> &'a str {
    suffixes
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(name)
}

/// Reduce a unit listing to the systemd section of the report
pub fn build_report(listing: UnitListing, config: &UnitSourceConfig) -> SourceReport {
    let mut notes: Vec<String> = listing.errors.iter().map(ToString::to_string).collect();

    let mut items: Vec<Item> = listing
        .facts
        .values()
        .filter_map(|fact| classify_unit(fact, config.inactive_ok))
        .map(|item| {
            if config.hide_ext {
                let display = strip_unit_suffix(&item.name, UNIT_SUFFIXES).to_string();
                item.with_display_name(display)
            } else {
                item
            }
        })
        .collect();
    sort_items(&mut items);

    let counts = TierCounts::tally(&items);
    debug!(
        good = counts.good,
        non_good = counts.non_good(),
        notes = notes.len(),
        "Classified systemd units"
    );

    let (tier, label) = if counts.good == 0 {
        (Tier::Critical, "critical")
    } else if counts.non_good() == 0 {
        (Tier::Good, "OK")
    } else {
        (Tier::Warning, "warning")
    };

    if config.failed_only {
        if tier.is_good() {
            items.clear();
            if !config.notes_when_collapsed {
                notes.clear();
            }
        } else {
            items.retain(|item| !item.tier.is_good());
        }
    }

    SourceReport::new(SOURCE_TITLE, tier, label, items, notes)
}
