//! JSON artifacts written at the end of a run.
//!
//! One `magic_rank_{year}.json` per ranked year, records-oriented, and one
//! `portfolio.json` with the per-year returns and the chained daily series.
//! Any write failure is returned to the caller and ends the run.

use crate::pipeline::RunReport;
use greenblatt_eval::PerformanceSummary;
use greenblatt_traits::{InstrumentId, KpiValue, RankedYear, Result, ReturnPoint, Year};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the ranking artifact for `year`.
#[must_use]
pub fn rank_file_name(year: Year) -> String {
    format!("magic_rank_{year}.json")
}

/// File name of the portfolio artifact.
pub const PORTFOLIO_FILE_NAME: &str = "portfolio.json";

/// One row of a ranking artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRecord<'a> {
    /// 1-based position in the year's ranking.
    pub position: usize,
    /// Instrument id.
    pub instrument_id: InstrumentId,
    /// Composite score; `None` when penalized for missing data.
    pub composite_score: Option<f64>,
    /// Rank per indicator; `None` for a missing value.
    pub ranks: BTreeMap<&'a str, Option<f64>>,
    /// Indicator values.
    pub values: &'a BTreeMap<String, KpiValue>,
    /// Company name.
    pub name: Option<&'a str>,
    /// Ticker symbol.
    pub ticker: Option<&'a str>,
    /// Market name.
    pub market: Option<&'a str>,
    /// Sector name.
    pub sector: Option<&'a str>,
    /// Country name.
    pub country: Option<&'a str>,
}

/// One year of the portfolio artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord<'a> {
    /// Year the basket was held.
    pub year: Year,
    /// Year the basket was ranked in.
    pub ranked_year: Year,
    /// Instruments held.
    pub basket: &'a [InstrumentId],
    /// Equal-weighted portfolio return for the year.
    pub annual_return: f64,
    /// Mean of the per-instrument annual returns.
    pub average_annual_return: Option<f64>,
    /// Per-instrument annual returns.
    pub instrument_returns: &'a BTreeMap<InstrumentId, f64>,
}

/// Contents of `portfolio.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord<'a> {
    /// Per-year basket returns.
    pub years: Vec<YearRecord<'a>>,
    /// Chained daily series.
    pub daily: &'a [ReturnPoint],
    /// Cumulative return over all years.
    pub cumulative_return: f64,
    /// Statistics of the chained series.
    pub summary: Option<PerformanceSummary>,
}

fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Ranking artifact rows for one year.
#[must_use]
pub fn rank_records<'a>(ranked: &'a RankedYear, report: &'a RunReport) -> Vec<RankRecord<'a>> {
    ranked
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let instrument = report.instrument(entry.instrument);
            RankRecord {
                position: i + 1,
                instrument_id: entry.instrument,
                composite_score: finite(entry.composite_score),
                ranks: entry
                    .ranks
                    .iter()
                    .map(|(k, v)| (k.as_str(), finite(*v)))
                    .collect(),
                values: &entry.values,
                name: instrument.map(|i| i.name.as_str()),
                ticker: instrument.map(|i| i.ticker.as_str()),
                market: instrument.and_then(|i| i.market.as_deref()),
                sector: instrument.and_then(|i| i.sector.as_deref()),
                country: instrument.and_then(|i| i.country.as_deref()),
            }
        })
        .collect()
}

/// Portfolio artifact contents.
#[must_use]
pub fn portfolio_record(report: &RunReport) -> PortfolioRecord<'_> {
    PortfolioRecord {
        years: report
            .returns
            .iter()
            .map(|(&year, r)| YearRecord {
                year,
                ranked_year: r.ranked_year,
                basket: &r.basket,
                annual_return: r.report.annual_return,
                average_annual_return: r.report.average_annual_return,
                instrument_returns: &r.report.instrument_returns,
            })
            .collect(),
        daily: report.portfolio.points(),
        cumulative_return: report.portfolio.cumulative_return(),
        summary: report.summary,
    }
}

/// Writes run artifacts into one directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer for `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every artifact of a run, returning the paths written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or any file
    /// cannot be written.
    pub fn write_all(&self, report: &RunReport) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let mut written = Vec::with_capacity(report.ranked.len() + 1);
        for (&year, ranked) in &report.ranked {
            let path = self.dir.join(rank_file_name(year));
            write_json(&path, &rank_records(ranked, report))?;
            written.push(path);
        }

        let path = self.dir.join(PORTFOLIO_FILE_NAME);
        write_json(&path, &portfolio_record(report))?;
        written.push(path);

        info!(dir = %self.dir.display(), files = written.len(), "Wrote artifacts");
        Ok(written)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
