//! Common types used throughout the Greenblatt workspace.
//!
//! This module defines the keys, value types and raw observation records that
//! flow between the data sources, the panel builder, the ranking engine and the
//! return engine.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A calendar or fiscal year.
pub type Year = i32;

/// Identifier of an indicator at the data source (e.g. Börsdata KPI id 36 for ROC).
pub type IndicatorId = u32;

/// Opaque integer key identifying a tradable instrument.
///
/// Stable across all KPI and price series for a run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct InstrumentId(pub u32);

impl InstrumentId {
    /// Returns the raw integer id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A single indicator value that may be missing.
///
/// Missing data is an explicit variant rather than a NaN so that every
/// consumer has to decide what a gap means: the ranking engine maps it to the
/// worst-rank sentinel and the return engine never sees it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum KpiValue {
    /// An observed, finite value.
    Value(f64),
    /// No usable observation.
    #[default]
    Missing,
}

impl KpiValue {
    /// Wrap a raw float; non-finite inputs become [`KpiValue::Missing`].
    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::Missing
        }
    }

    /// Returns the value, if present.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing => None,
        }
    }

    /// Whether the value is missing.
    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<Option<f64>> for KpiValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::new)
    }
}

impl From<KpiValue> for Option<f64> {
    fn from(value: KpiValue) -> Self {
        value.value()
    }
}

/// Which end of an indicator's scale ranks first.
///
/// Always configured explicitly per indicator; never inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Larger values rank better (profitability, yields).
    HigherIsBetter,
    /// Smaller values rank better (price multiples such as P/E).
    LowerIsBetter,
}

impl Direction {
    /// Whether larger values rank better.
    #[must_use]
    pub const fn higher_is_better(self) -> bool {
        matches!(self, Self::HigherIsBetter)
    }
}

/// One `(period, value)` observation of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Reporting period (year).
    pub period: Year,
    /// Observed value.
    pub value: KpiValue,
}

/// Time-indexed observations of one indicator for one instrument.
///
/// Periods need not be contiguous. Duplicate periods are tolerated; consumers
/// apply last-write-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    observations: Vec<Observation>,
}

impl IndicatorSeries {
    /// Create a series from observations in source order.
    #[must_use]
    pub const fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Build a series from `(period, raw value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Year, Option<f64>)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(period, value)| Observation {
                    period,
                    value: value.into(),
                })
                .collect(),
        )
    }

    /// Observations in source order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Reference record for a tradable instrument, joined with its market,
/// sector and country names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Instrument id.
    pub id: InstrumentId,
    /// Company name.
    pub name: String,
    /// Ticker symbol.
    pub ticker: String,
    /// Market (list) name, e.g. "Large Cap".
    pub market: Option<String>,
    /// Sector name.
    pub sector: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

/// One trading day for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    /// Instrument id.
    pub instrument: InstrumentId,
    /// Trading date.
    pub date: Date,
    /// Opening price.
    pub open: f64,
    /// Closing price.
    pub close: f64,
}

/// Inclusive range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    /// First year (inclusive).
    pub start: Year,
    /// Last year (inclusive).
    pub end: Year,
}

impl YearWindow {
    /// Create a window, ordering the bounds if given in reverse.
    #[must_use]
    pub const fn new(a: Year, b: Year) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Whether the window contains `year`.
    #[must_use]
    pub const fn contains(&self, year: Year) -> bool {
        year >= self.start && year <= self.end
    }

    /// Years in the window, ascending.
    pub fn years(&self) -> impl Iterator<Item = Year> {
        self.start..=self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_value_non_finite_is_missing() {
        assert_eq!(KpiValue::new(f64::NAN), KpiValue::Missing);
        assert_eq!(KpiValue::new(f64::INFINITY), KpiValue::Missing);
        assert_eq!(KpiValue::new(1.5).value(), Some(1.5));
    }

    #[test]
    fn test_kpi_value_serde_as_nullable_number() {
        let json = serde_json::to_string(&vec![KpiValue::Value(0.25), KpiValue::Missing]).unwrap();
        assert_eq!(json, "[0.25,null]");

        let back: Vec<KpiValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![KpiValue::Value(0.25), KpiValue::Missing]);
    }

    #[test]
    fn test_series_from_pairs() {
        let series = IndicatorSeries::from_pairs([(2020, Some(0.3)), (2021, None)]);
        assert_eq!(series.len(), 2);
        assert!(series.observations()[1].value.is_missing());
    }

    #[test]
    fn test_year_window() {
        let window = YearWindow::new(2021, 2019);
        assert_eq!(window.start, 2019);
        assert!(window.contains(2021));
        assert!(!window.contains(2022));
        assert_eq!(window.years().collect::<Vec<_>>(), vec![2019, 2020, 2021]);
    }

    #[test]
    fn test_instrument_id_display() {
        let id = InstrumentId::from(97);
        assert_eq!(id.to_string(), "97");
        assert_eq!(u32::from(id), 97);
    }
}
