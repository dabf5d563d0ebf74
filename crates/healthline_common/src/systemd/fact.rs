//! Raw unit facts as reported by the service manager

use crate::error::ProbeError;
use serde::Serialize;
use std::collections::BTreeMap;

/// What the service manager told us about one unit.
///
/// Every field is optional: `None` means the provider never reported it,
/// which is different from a unit that reported an empty state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitFact {
    pub name: String,
    pub active_state: Option<String>,
    pub load_state: Option<String>,
    pub result: Option<String>,
    pub exec_main_status: Option<String>,
}

impl UnitFact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// No field was populated, the unit is left out of the report
    pub fn is_empty(&self) -> bool {
        self.active_state.is_none()
            && self.load_state.is_none()
            && self.result.is_none()
            && self.exec_main_status.is_none()
    }

    /// Every field is known, no property query needed
    pub fn is_complete(&self) -> bool {
        self.active_state.is_some()
            && self.load_state.is_some()
            && self.result.is_some()
            && self.exec_main_status.is_some()
    }

    /// Record a `Key=value` property. Known fields are never overwritten and
    /// empty values are ignored.
    pub fn set_property(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        let slot = match key {
            "ActiveState" => &mut self.active_state,
            "LoadState" => &mut self.load_state,
            "Result" => &mut self.result,
            "ExecMainStatus" => &mut self.exec_main_status,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    /// Merge a second observation of the same unit, keeping what we had
    pub fn fill_missing(&mut self, other: UnitFact) {
        fn fill(slot: &mut Option<String>, value: Option<String>) {
            if slot.is_none() {
                *slot = value;
            }
        }

        fill(&mut self.active_state, other.active_state);
        fill(&mut self.load_state, other.load_state);
        fill(&mut self.result, other.result);
        fill(&mut self.exec_main_status, other.exec_main_status);
    }
}

/// Everything a unit provider returned for one run
#[derive(Debug, Default)]
pub struct UnitListing {
    /// Facts keyed by unit name. A missing name is the same as an empty fact.
    pub facts: BTreeMap<String, UnitFact>,
    /// Per-unit failures, each one excluded from classification
    pub errors: Vec<ProbeError>,
}

impl UnitListing {
    /// Insert a fact, merging with an earlier observation of the same unit
    pub fn insert(&mut self, fact: UnitFact) {
        match self.facts.get_mut(&fact.name) {
            Some(existing) => existing.fill_missing(fact),
            None => {
                self.facts.insert(fact.name.clone(), fact);
            }
        }
    }
}
