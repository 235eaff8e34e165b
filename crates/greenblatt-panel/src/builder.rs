//! Per-instrument KPI fetch and panel assembly.

use crate::derived::ReciprocalField;
use crate::merge::outer_join;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use greenblatt_traits::{
    GreenblattError, IndicatorId, IndicatorSeries, InstrumentId, KpiPanel, KpiRow, KpiSource,
    PriceAggregation, ReportPeriod, Result, YearWindow,
};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default number of instruments fetched concurrently.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default timeout for a single indicator fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Panel construction configuration.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Indicator name to source indicator id. Must not be empty.
    pub indicators: BTreeMap<String, IndicatorId>,
    /// Years kept in the output (inclusive).
    pub window: YearWindow,
    /// Reporting periodicity requested from the source.
    pub period: ReportPeriod,
    /// Price aggregation requested from the source.
    pub aggregation: PriceAggregation,
    /// Derived reciprocal fields added after the merge.
    pub derived: Vec<ReciprocalField>,
    /// Maximum instruments fetched at once.
    pub concurrency: usize,
    /// Upper bound on each indicator fetch.
    pub fetch_timeout: Duration,
}

impl PanelConfig {
    /// Create a configuration for `indicators` over `window` with defaults
    /// for everything else.
    #[must_use]
    pub fn new(indicators: BTreeMap<String, IndicatorId>, window: YearWindow) -> Self {
        Self {
            indicators,
            window,
            period: ReportPeriod::Year,
            aggregation: PriceAggregation::Mean,
            derived: vec![ReciprocalField::earnings_yield()],
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Columns a panel built with this configuration can carry: every
    /// requested indicator plus each derived field whose source is requested.
    #[must_use]
    pub fn columns(&self) -> BTreeSet<&str> {
        let mut columns: BTreeSet<&str> = self.indicators.keys().map(String::as_str).collect();
        for field in &self.derived {
            if self.indicators.contains_key(&field.source) {
                columns.insert(field.target.as_str());
            }
        }
        columns
    }

    fn validate(&self) -> Result<()> {
        if self.indicators.is_empty() {
            return Err(GreenblattError::InvalidConfig(
                "at least one indicator must be requested".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(GreenblattError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(GreenblattError::InvalidConfig(
                "fetch timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// An instrument left out of the panel, with the reason.
#[derive(Debug)]
pub struct Exclusion {
    /// Excluded instrument.
    pub instrument: InstrumentId,
    /// Why it was excluded.
    pub error: GreenblattError,
}

/// Result of assembling a panel across instruments.
#[derive(Debug, Default)]
pub struct PanelBuild {
    /// Completed panel, read-only from here on.
    pub panel: KpiPanel,
    /// Instruments that contributed no rows.
    pub excluded: Vec<Exclusion>,
}

/// Builds KPI rows for instruments from a [`KpiSource`].
///
/// Each instrument is built independently; nothing it does is visible to
/// other instruments until its rows are complete.
#[derive(Debug)]
pub struct PanelBuilder<'a, S> {
    source: &'a S,
    config: PanelConfig,
}

impl<'a, S: KpiSource> PanelBuilder<'a, S> {
    /// Create a builder.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::InvalidConfig`] if no indicator is requested
    /// or the concurrency is zero.
    pub fn new(source: &'a S, config: PanelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Fetch, merge, derive and window the KPI history of one instrument.
    ///
    /// Indicator fetches run concurrently. A failing or timed-out indicator
    /// is logged and left out; an indicator with an empty series is simply
    /// absent from the rows.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::NoData`] if every indicator fetch failed or
    /// no row survives the year window.
    pub async fn build(&self, instrument: InstrumentId) -> Result<Vec<KpiRow>> {
        let results = join_all(
            self.config
                .indicators
                .iter()
                .map(|(name, id)| async move { (name.as_str(), self.fetch(instrument, *id).await) }),
        )
        .await;

        let mut fetched: Vec<(&str, IndicatorSeries)> = Vec::with_capacity(results.len());
        let mut faults = 0;
        for (name, result) in results {
            match result {
                Ok(series) if series.is_empty() => {
                    debug!(%instrument, indicator = name, "empty indicator series");
                }
                Ok(series) => fetched.push((name, series)),
                Err(e) => {
                    faults += 1;
                    warn!(%instrument, indicator = name, error = %e, "indicator fetch failed");
                }
            }
        }

        if faults == self.config.indicators.len() {
            error!(%instrument, "all indicator fetches failed");
            return Err(GreenblattError::NoData(instrument));
        }

        let mut rows = outer_join(instrument, &fetched);
        rows.retain(|r| self.config.window.contains(r.year));
        for field in &self.config.derived {
            if !field.apply(&mut rows) {
                debug!(%instrument, source = %field.source, target = %field.target, "derived field skipped");
            }
        }

        if rows.is_empty() {
            warn!(%instrument, "no KPI data inside the year window");
            return Err(GreenblattError::NoData(instrument));
        }
        Ok(rows)
    }

    /// Build a panel for `instruments` with at most `concurrency` instruments
    /// in flight.
    ///
    /// Rows are appended in the order of `instruments`, so the panel's
    /// instrument order does not depend on completion order. Failed
    /// instruments are listed in [`PanelBuild::excluded`] and never abort the
    /// build. Dropping the returned future abandons in-flight fetches without
    /// exposing a partial panel.
    pub async fn build_panel(&self, instruments: &[InstrumentId]) -> PanelBuild {
        let results: Vec<(InstrumentId, Result<Vec<KpiRow>>)> =
            stream::iter(instruments.iter().copied())
                .map(|id| async move { (id, self.build(id).await) })
                .buffered(self.config.concurrency)
                .collect()
                .await;

        let mut build = PanelBuild::default();
        for (id, result) in results {
            match result.and_then(|rows| build.panel.append(id, rows)) {
                Ok(()) => debug!(instrument = %id, "instrument added to panel"),
                Err(error) => {
                    warn!(instrument = %id, %error, "instrument excluded from panel");
                    build.excluded.push(Exclusion {
                        instrument: id,
                        error,
                    });
                }
            }
        }

        info!(
            instruments = build.panel.instruments().len(),
            excluded = build.excluded.len(),
            rows = build.panel.len(),
            "panel built"
        );
        build
    }

    async fn fetch(
        &self,
        instrument: InstrumentId,
        indicator: IndicatorId,
    ) -> Result<IndicatorSeries> {
        let fetch = self.source.fetch_indicator_history(
            instrument,
            indicator,
            self.config.period,
            self.config.aggregation,
        );
        match tokio::time::timeout(self.config.fetch_timeout, fetch).await {
            Ok(Ok(series)) => Ok(series),
            Ok(Err(e)) => Err(GreenblattError::FetchFault {
                instrument,
                indicator,
                reason: e.to_string(),
            }),
            Err(_) => Err(GreenblattError::FetchFault {
                instrument,
                indicator,
                reason: format!("timed out after {:?}", self.config.fetch_timeout),
            }),
        }
    }
}
