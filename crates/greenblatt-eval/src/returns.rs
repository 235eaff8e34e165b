//! Basket return computation.
//!
//! Daily price bars for a basket are pivoted into a date-indexed table, turned
//! into equal-weighted daily portfolio returns and compounded into a
//! [`ReturnSeries`]. Per-instrument annual returns are computed alongside from
//! each instrument's own first and last close of the year.

use chrono::Datelike;
use greenblatt_traits::{
    Date, GreenblattError, InstrumentId, PriceBar, Result, ReturnSeries, Year,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// How one instrument's return for one day is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyReturnPolicy {
    /// `(close - open) / open` of the same day. Overnight moves are ignored.
    #[default]
    Intraday,
    /// `close / previous close - 1`. An instrument's first bar has no return.
    CloseToClose,
}

/// Configuration for return computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnConfig {
    /// Daily return definition.
    pub policy: DailyReturnPolicy,
}

#[derive(Debug, Clone, Copy)]
struct Quote {
    open: f64,
    close: f64,
}

/// Price bars pivoted to one row per date with an open/close pair per
/// instrument.
#[derive(Debug, Clone, Default)]
pub struct PricePivot {
    rows: BTreeMap<Date, BTreeMap<InstrumentId, Quote>>,
}

impl PricePivot {
    /// Pivot bars by date. A repeated `(date, instrument)` keeps the last bar.
    pub fn from_bars<'a, I>(bars: I) -> Self
    where
        I: IntoIterator<Item = &'a PriceBar>,
    {
        let mut rows: BTreeMap<Date, BTreeMap<InstrumentId, Quote>> = BTreeMap::new();
        for bar in bars {
            rows.entry(bar.date).or_default().insert(
                bar.instrument,
                Quote {
                    open: bar.open,
                    close: bar.close,
                },
            );
        }
        Self { rows }
    }

    /// Trading dates, ascending.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.rows.keys().copied()
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Equal-weighted portfolio return for each date of `year`.
    ///
    /// Each date's return is the mean over the instruments that have a usable
    /// return that day; instruments without one are left out of the mean
    /// rather than counted as zero. Dates where no instrument has a usable
    /// return are omitted.
    #[must_use]
    pub fn portfolio_returns(&self, year: Year, policy: DailyReturnPolicy) -> Vec<(Date, f64)> {
        let mut previous_close: BTreeMap<InstrumentId, f64> = BTreeMap::new();
        let mut out = Vec::new();

        for (&date, quotes) in &self.rows {
            let mut sum = 0.0;
            let mut count = 0usize;
            for (&instrument, quote) in quotes {
                let daily = match policy {
                    DailyReturnPolicy::Intraday => simple_return(quote.open, quote.close),
                    DailyReturnPolicy::CloseToClose => previous_close
                        .get(&instrument)
                        .and_then(|&prev| simple_return(prev, quote.close)),
                };
                if quote.close.is_finite() {
                    previous_close.insert(instrument, quote.close);
                }
                if date.year() == year
                    && let Some(r) = daily
                {
                    sum += r;
                    count += 1;
                }
            }
            if count > 0 {
                out.push((date, sum / count as f64));
            }
        }
        out
    }
}

fn simple_return(from: f64, to: f64) -> Option<f64> {
    let r = (to - from) / from;
    (from > 0.0 && r.is_finite()).then_some(r)
}

/// Returns of one basket over one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReport {
    /// Year the returns cover.
    pub year: Year,
    /// `last close / first close - 1` per instrument within the year.
    pub instrument_returns: BTreeMap<InstrumentId, f64>,
    /// Mean of the per-instrument annual returns.
    pub average_annual_return: Option<f64>,
    /// Equal-weighted daily portfolio returns for the year.
    pub series: ReturnSeries,
    /// Product of the year's daily growth factors, minus one.
    pub annual_return: f64,
}

/// Computes basket returns from daily price bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnEngine {
    config: ReturnConfig,
}

impl ReturnEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub const fn new(config: ReturnConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &ReturnConfig {
        &self.config
    }

    /// Compute per-instrument annual returns and the equal-weighted portfolio
    /// series for `year`.
    ///
    /// Bars from other years are allowed; they bound the valid year range and,
    /// under [`DailyReturnPolicy::CloseToClose`], supply the previous close for
    /// the first day of the year.
    ///
    /// # Errors
    ///
    /// - [`GreenblattError::YearOutOfRange`] if `year` lies outside the calendar
    ///   years spanned by `bars`.
    /// - [`GreenblattError::NoDataForYear`] if `bars` is empty or no date in
    ///   `year` yields a usable portfolio return.
    pub fn compute_returns(&self, bars: &[PriceBar], year: Year) -> Result<ReturnReport> {
        let (min, max) = year_span(bars).ok_or(GreenblattError::NoDataForYear(year))?;
        if year < min || year > max {
            return Err(GreenblattError::YearOutOfRange { year, min, max });
        }

        let instrument_returns = annual_returns(bars, year);
        for (instrument, r) in &instrument_returns {
            debug!(%instrument, year, annual_return = r, "Instrument annual return");
        }
        let average_annual_return = (!instrument_returns.is_empty()).then(|| {
            instrument_returns.values().sum::<f64>() / instrument_returns.len() as f64
        });

        let pivot = PricePivot::from_bars(bars);
        let daily = pivot.portfolio_returns(year, self.config.policy);
        if daily.is_empty() {
            return Err(GreenblattError::NoDataForYear(year));
        }

        let series = ReturnSeries::from_daily_returns(daily);
        let annual_return = series.cumulative_return();

        Ok(ReturnReport {
            year,
            instrument_returns,
            average_annual_return,
            series,
            annual_return,
        })
    }
}

/// Compute returns for `year` with the default (intraday) policy.
///
/// # Errors
///
/// See [`ReturnEngine::compute_returns`].
pub fn compute_returns(bars: &[PriceBar], year: Year) -> Result<ReturnReport> {
    ReturnEngine::default().compute_returns(bars, year)
}

fn year_span(bars: &[PriceBar]) -> Option<(Year, Year)> {
    let min = bars.iter().map(|b| b.date.year()).min()?;
    let max = bars.iter().map(|b| b.date.year()).max()?;
    Some((min, max))
}

/// `last close / first close - 1` per instrument, using each instrument's own
/// first and last trading day in `year`.
fn annual_returns(bars: &[PriceBar], year: Year) -> BTreeMap<InstrumentId, f64> {
    let mut bounds: BTreeMap<InstrumentId, (&PriceBar, &PriceBar)> = BTreeMap::new();
    for bar in bars.iter().filter(|b| b.date.year() == year) {
        bounds
            .entry(bar.instrument)
            .and_modify(|(first, last)| {
                if bar.date < first.date {
                    *first = bar;
                }
                if bar.date >= last.date {
                    *last = bar;
                }
            })
            .or_insert((bar, bar));
    }

    bounds
        .into_iter()
        .filter_map(|(instrument, (first, last))| {
            simple_return(first.close, last.close).map(|r| (instrument, r))
        })
        .collect()
}
