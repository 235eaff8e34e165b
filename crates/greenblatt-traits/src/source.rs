//! Data source traits.
//!
//! The core never talks to a network directly. It asks a [`KpiSource`] for
//! indicator histories and a [`PriceSource`] for daily prices. Adapters own
//! transport, authentication, rate limiting and any retry policy.
//!
//! [`InMemoryKpiSource`] and [`InMemoryPriceSource`] serve fixed data, for
//! replaying stored datasets and for tests.

use crate::error::{GreenblattError, Result};
use crate::types::{IndicatorId, IndicatorSeries, InstrumentId, PriceBar};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::future::Future;

/// Reporting periodicity of an indicator history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Full-year reports.
    #[default]
    Year,
    /// Rolling twelve months.
    R12,
    /// Quarterly reports.
    Quarter,
}

impl ReportPeriod {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::R12 => "r12",
            Self::Quarter => "quarter",
        }
    }
}

/// How price-dependent indicators aggregate the share price over a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceAggregation {
    /// Mean price over the period.
    #[default]
    Mean,
    /// Price at the period's high.
    High,
    /// Price at the period's low.
    Low,
}

impl PriceAggregation {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Supplies per-instrument indicator histories.
pub trait KpiSource: Send + Sync {
    /// Fetch the history of `indicator` for `instrument`.
    ///
    /// An instrument without observations yields an empty series, not an error.
    fn fetch_indicator_history(
        &self,
        instrument: InstrumentId,
        indicator: IndicatorId,
        period: ReportPeriod,
        aggregation: PriceAggregation,
    ) -> impl Future<Output = Result<IndicatorSeries>> + Send;
}

/// Supplies daily price bars.
pub trait PriceSource: Send + Sync {
    /// Fetch daily bars for `instruments`, sorted by date per instrument.
    fn fetch_daily_prices(
        &self,
        instruments: &[InstrumentId],
    ) -> impl Future<Output = Result<Vec<PriceBar>>> + Send;
}

/// KPI source backed by a map of stored series.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKpiSource {
    series: HashMap<(InstrumentId, IndicatorId), IndicatorSeries>,
    failing: HashSet<(InstrumentId, IndicatorId)>,
}

impl InMemoryKpiSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series, replacing any previous one.
    #[must_use]
    pub fn with_series(
        mut self,
        instrument: InstrumentId,
        indicator: IndicatorId,
        series: IndicatorSeries,
    ) -> Self {
        self.series.insert((instrument, indicator), series);
        self
    }

    /// Make every fetch of `(instrument, indicator)` fail.
    #[must_use]
    pub fn with_failure(mut self, instrument: InstrumentId, indicator: IndicatorId) -> Self {
        self.failing.insert((instrument, indicator));
        self
    }
}

impl KpiSource for InMemoryKpiSource {
    async fn fetch_indicator_history(
        &self,
        instrument: InstrumentId,
        indicator: IndicatorId,
        _period: ReportPeriod,
        _aggregation: PriceAggregation,
    ) -> Result<IndicatorSeries> {
        if self.failing.contains(&(instrument, indicator)) {
            return Err(GreenblattError::DataFetch(format!(
                "stored failure for instrument {instrument}, indicator {indicator}"
            )));
        }
        Ok(self
            .series
            .get(&(instrument, indicator))
            .cloned()
            .unwrap_or_default())
    }
}

/// Price source backed by a list of stored bars.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    bars: Vec<PriceBar>,
}

impl InMemoryPriceSource {
    /// Create a source serving `bars`.
    #[must_use]
    pub const fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }
}

impl PriceSource for InMemoryPriceSource {
    async fn fetch_daily_prices(&self, instruments: &[InstrumentId]) -> Result<Vec<PriceBar>> {
        let mut bars: Vec<PriceBar> = self
            .bars
            .iter()
            .filter(|b| instruments.contains(&b.instrument))
            .copied()
            .collect();
        bars.sort_by_key(|b| (b.instrument, b.date));
        Ok(bars)
    }
}
