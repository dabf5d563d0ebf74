//! Health tiers and per-source reports
//!
//! Every source (systemd units, CPU sensors) reduces its facts to the same
//! shape: a list of classified items plus one aggregate header.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-level health classification of an item or a source header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Warning,
    Critical,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Warning => "warning",
            Tier::Critical => "critical",
        }
    }

    pub fn is_good(&self) -> bool {
        matches!(self, Tier::Good)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified entity within a source (a unit, a sensor channel)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Canonical name, the only sort key
    pub name: String,
    /// Name as shown to the user
    pub display_name: String,
    pub tier: Tier,
    pub label: String,
}

impl Item {
    pub fn new(name: impl Into<String>, tier: Tier, label: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            tier,
            label: label.into(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

/// Sort items by canonical name. Stable, so equal names keep probe order.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Number of items per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub good: usize,
    pub warning: usize,
    pub critical: usize,
}

impl TierCounts {
    pub fn tally<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut counts = Self::default();
        for item in items {
            match item.tier {
                Tier::Good => counts.good += 1,
                Tier::Warning => counts.warning += 1,
                Tier::Critical => counts.critical += 1,
            }
        }
        counts
    }

    pub fn non_good(&self) -> usize {
        self.warning + self.critical
    }

    pub fn total(&self) -> usize {
        self.good + self.non_good()
    }
}

/// Finished report for one source.
///
/// Built once by a source aggregator and handed to the assembler. The header
/// is derived from the items by the aggregator, so there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    title: String,
    header_tier: Tier,
    header_label: String,
    items: Vec<Item>,
    notes: Vec<String>,
}

impl SourceReport {
    pub(crate) fn new(
        title: impl Into<String>,
        header_tier: Tier,
        header_label: impl Into<String>,
        items: Vec<Item>,
        notes: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            header_tier,
            header_label: header_label.into(),
            items,
            notes,
        }
    }

    /// Report with a header and nothing else, used for degraded sources
    pub fn header_only(title: impl Into<String>, tier: Tier, label: impl Into<String>) -> Self {
        Self::new(title, tier, label, Vec::new(), Vec::new())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn header_tier(&self) -> Tier {
        self.header_tier
    }

    pub fn header_label(&self) -> &str {
        &self.header_label
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}
