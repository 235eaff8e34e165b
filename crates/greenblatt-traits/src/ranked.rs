//! Ranked output of one year.

use crate::types::{InstrumentId, KpiValue, Year};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rank assigned to a missing indicator value.
///
/// Any composite that includes it is itself infinite, which places the
/// instrument behind every instrument with complete data.
pub const WORST_RANK: f64 = f64::INFINITY;

/// One instrument's position in a ranked year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// Instrument id.
    pub instrument: InstrumentId,
    /// Sum of the per-indicator ranks; lower is better.
    pub composite_score: f64,
    /// Rank per indicator (1 = best, [`WORST_RANK`] when missing).
    pub ranks: BTreeMap<String, f64>,
    /// Indicator values the ranks were computed from.
    pub values: BTreeMap<String, KpiValue>,
}

impl RankedEntry {
    /// Whether the entry carries the missing-data penalty.
    #[must_use]
    pub fn is_penalized(&self) -> bool {
        self.composite_score.is_infinite()
    }
}

/// Top-ranked instruments for one year, ascending by composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedYear {
    /// Year the ranking was computed for.
    pub year: Year,
    /// Entries sorted ascending by composite score, truncated to top N.
    pub entries: Vec<RankedEntry>,
}

impl RankedYear {
    /// Instrument ids in rank order (the year's basket).
    #[must_use]
    pub fn instruments(&self) -> Vec<InstrumentId> {
        self.entries.iter().map(|e| e.instrument).collect()
    }

    /// Number of ranked entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
