//! The year-by-instrument KPI panel.
//!
//! A [`KpiPanel`] holds at most one [`KpiRow`] per `(Year, InstrumentId)`.
//! It is filled one instrument at a time by the panel builder and read
//! without mutation by the ranking engine.

use crate::error::{GreenblattError, Result};
use crate::types::{InstrumentId, KpiValue, Year};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Indicator values for one `(year, instrument)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRow {
    /// Year of the observations.
    pub year: Year,
    /// Instrument the row belongs to.
    pub instrument: InstrumentId,
    /// Indicator name to value.
    pub values: BTreeMap<String, KpiValue>,
}

impl KpiRow {
    /// Create an empty row.
    #[must_use]
    pub const fn new(year: Year, instrument: InstrumentId) -> Self {
        Self {
            year,
            instrument,
            values: BTreeMap::new(),
        }
    }

    /// Value of `indicator`; absent indicators read as [`KpiValue::Missing`].
    #[must_use]
    pub fn get(&self, indicator: &str) -> KpiValue {
        self.values.get(indicator).copied().unwrap_or_default()
    }

    /// Set `indicator` to `value`, replacing any previous value.
    pub fn set(&mut self, indicator: impl Into<String>, value: KpiValue) {
        self.values.insert(indicator.into(), value);
    }

    /// Whether the row carries a column for `indicator` (possibly missing).
    #[must_use]
    pub fn has(&self, indicator: &str) -> bool {
        self.values.contains_key(indicator)
    }
}

/// Panel of KPI rows keyed by `(year, instrument)`.
///
/// Construction is append-only: each instrument's full history goes in with a
/// single [`KpiPanel::append`] call, and a second append for the same
/// instrument is rejected.
#[derive(Debug, Clone, Default)]
pub struct KpiPanel {
    rows: BTreeMap<(Year, InstrumentId), KpiRow>,
    instruments: Vec<InstrumentId>,
    appended: BTreeSet<InstrumentId>,
}

impl KpiPanel {
    /// Create an empty panel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            instruments: Vec::new(),
            appended: BTreeSet::new(),
        }
    }

    /// Append the complete history of one instrument.
    ///
    /// Every row must belong to `instrument`. Rows repeating a year replace the
    /// earlier row for that year.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::DuplicateInstrument`] if the instrument was
    /// already appended, or [`GreenblattError::InvalidData`] if a row belongs to
    /// another instrument.
    pub fn append(&mut self, instrument: InstrumentId, rows: Vec<KpiRow>) -> Result<()> {
        if self.appended.contains(&instrument) {
            return Err(GreenblattError::DuplicateInstrument(instrument));
        }
        if let Some(row) = rows.iter().find(|r| r.instrument != instrument) {
            return Err(GreenblattError::InvalidData(format!(
                "row for instrument {} appended under instrument {instrument}",
                row.instrument
            )));
        }

        self.appended.insert(instrument);
        self.instruments.push(instrument);
        for row in rows {
            self.rows.insert((row.year, instrument), row);
        }
        Ok(())
    }

    /// Row for `(year, instrument)`, if present.
    #[must_use]
    pub fn get(&self, year: Year, instrument: InstrumentId) -> Option<&KpiRow> {
        self.rows.get(&(year, instrument))
    }

    /// Instruments in the order they were appended.
    #[must_use]
    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }

    /// Whether `instrument` has been appended.
    #[must_use]
    pub fn contains_instrument(&self, instrument: InstrumentId) -> bool {
        self.appended.contains(&instrument)
    }

    /// Distinct years present in the panel, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<Year> {
        self.rows
            .keys()
            .map(|(year, _)| *year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows for `year`, in instrument append order.
    #[must_use]
    pub fn rows_for_year(&self, year: Year) -> Vec<&KpiRow> {
        self.instruments
            .iter()
            .filter_map(|id| self.rows.get(&(year, *id)))
            .collect()
    }

    /// Total number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the panel has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
