//! End-to-end runs over in-memory sources.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use greenblatt::traits::{
    GreenblattError, InMemoryKpiSource, InMemoryPriceSource, IndicatorSeries, Instrument,
    InstrumentId, PriceBar, PriceSource, Result, YearWindow,
};
use greenblatt::{ArtifactWriter, RunConfig, RunContext};

const ROC: u32 = 36;
const PE: u32 = 2;

fn instrument(id: u32, name: &str, sector: &str) -> Instrument {
    Instrument {
        id: InstrumentId(id),
        name: name.to_string(),
        ticker: name[..3].to_uppercase(),
        market: Some("Large Cap".to_string()),
        sector: Some(sector.to_string()),
        country: Some("Sverige".to_string()),
    }
}

fn universe() -> Vec<Instrument> {
    vec![
        instrument(1, "Alpha", "Industri"),
        instrument(2, "Beta", "Industri"),
        instrument(3, "Gamma", "Hälsovård"),
        instrument(4, "Delta", "Energi"),
    ]
}

fn series(pairs: &[(i32, Option<f64>)]) -> IndicatorSeries {
    IndicatorSeries::from_pairs(pairs.iter().copied())
}

fn kpi_source() -> InMemoryKpiSource {
    InMemoryKpiSource::new()
        .with_series(InstrumentId(1), ROC, series(&[(2020, Some(0.30)), (2021, Some(0.25))]))
        .with_series(InstrumentId(1), PE, series(&[(2020, Some(10.0)), (2021, Some(8.0))]))
        .with_series(InstrumentId(2), ROC, series(&[(2020, Some(0.10)), (2021, Some(0.15))]))
        .with_series(InstrumentId(2), PE, series(&[(2020, Some(5.0)), (2021, Some(20.0))]))
        .with_series(InstrumentId(3), ROC, series(&[(2020, Some(0.20)), (2021, Some(0.20))]))
        .with_series(InstrumentId(3), PE, series(&[(2021, Some(10.0))]))
        .with_series(InstrumentId(4), ROC, series(&[(2020, Some(0.90)), (2021, Some(0.90))]))
        .with_series(InstrumentId(4), PE, series(&[(2020, Some(1.0)), (2021, Some(1.0))]))
}

fn bar(id: u32, (y, m, d): (i32, u32, u32), open: f64, close: f64) -> PriceBar {
    PriceBar {
        instrument: InstrumentId(id),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        open,
        close,
    }
}

fn price_source() -> InMemoryPriceSource {
    InMemoryPriceSource::new(vec![
        bar(1, (2020, 3, 2), 100.0, 110.0),
        bar(1, (2020, 3, 3), 110.0, 99.0),
        bar(2, (2020, 3, 2), 50.0, 50.0),
        bar(2, (2020, 3, 3), 50.0, 55.0),
        bar(1, (2021, 3, 1), 100.0, 101.0),
        bar(3, (2021, 3, 1), 20.0, 19.8),
        bar(2, (2021, 3, 1), 10.0, 10.0),
    ])
}

fn config(top_n: usize) -> RunConfig {
    let mut config = RunConfig {
        window: YearWindow::new(2020, 2021),
        ..Default::default()
    };
    config.ranking.top_n = top_n;
    config
}

#[tokio::test]
async fn test_full_run() {
    let kpis = kpi_source();
    let prices = price_source();
    let context = RunContext::new(&kpis, &prices, config(2)).unwrap();

    let report = context.run(&universe()).await.unwrap();

    // Delta is in an excluded sector.
    assert_eq!(report.universe.len(), 3);
    assert!(report.excluded.is_empty());

    let ranked_2020 = &report.ranked[&2020];
    assert_eq!(
        ranked_2020.instruments(),
        vec![InstrumentId(1), InstrumentId(2)]
    );
    assert_relative_eq!(ranked_2020.entries[0].composite_score, 3.0);
    assert_relative_eq!(ranked_2020.entries[1].composite_score, 3.0);

    let ranked_2021 = &report.ranked[&2021];
    assert_eq!(
        ranked_2021.instruments(),
        vec![InstrumentId(1), InstrumentId(3)]
    );

    let returns_2020 = &report.returns[&2020];
    assert_eq!(returns_2020.ranked_year, 2020);
    assert_relative_eq!(returns_2020.report.annual_return, 0.05, epsilon = 1e-12);

    let returns_2021 = &report.returns[&2021];
    assert_relative_eq!(returns_2021.report.annual_return, 0.0, epsilon = 1e-12);

    assert_eq!(report.portfolio.len(), 3);
    assert_relative_eq!(report.portfolio.cumulative_growth(), 1.05, epsilon = 1e-12);
    assert!(report.summary.is_some());
    assert!(report.return_faults.is_empty());
}

#[tokio::test]
async fn test_failed_instrument_is_excluded_and_sparse_year_skipped() {
    let kpis = kpi_source()
        .with_failure(InstrumentId(2), ROC)
        .with_failure(InstrumentId(2), PE);
    let prices = price_source();
    let context = RunContext::new(&kpis, &prices, config(10)).unwrap();

    let report = context.run(&universe()).await.unwrap();

    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].instrument, InstrumentId(2));
    assert!(matches!(
        report.excluded[0].error,
        GreenblattError::NoData(InstrumentId(2))
    ));

    // 2020: only Alpha has both ROC and P/E.
    assert!(!report.ranked.contains_key(&2020));
    assert_eq!(report.skipped_years.len(), 1);
    assert!(matches!(
        report.skipped_years[0].error,
        GreenblattError::InsufficientYearData {
            year: 2020,
            usable: 1
        }
    ));

    assert_eq!(
        report.ranked[&2021].instruments(),
        vec![InstrumentId(1), InstrumentId(3)]
    );
}

#[tokio::test]
async fn test_holding_year_outside_prices_is_absorbed() {
    let kpis = kpi_source();
    let prices = price_source();
    let mut config = config(2);
    config.holding_offset = 1;
    let context = RunContext::new(&kpis, &prices, config).unwrap();

    let report = context.run(&universe()).await.unwrap();

    // 2020 basket held in 2021; 2021 basket would be held in 2022.
    assert_eq!(report.returns.keys().copied().collect::<Vec<_>>(), vec![2021]);
    assert_eq!(report.return_faults.len(), 1);
    assert!(matches!(
        report.return_faults[0].error,
        GreenblattError::YearOutOfRange { year: 2022, .. }
    ));
}

/// Price source that never answers.
struct StalledPrices;

impl PriceSource for StalledPrices {
    async fn fetch_daily_prices(&self, _instruments: &[InstrumentId]) -> Result<Vec<PriceBar>> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalled_price_fetch_times_out() {
    let kpis = kpi_source();
    let prices = StalledPrices;
    let mut config = config(2);
    config.fetch_timeout_secs = 1;
    let context = RunContext::new(&kpis, &prices, config).unwrap();

    let report = tokio::time::timeout(
        std::time::Duration::from_secs(60),
        context.run(&universe()),
    )
    .await
    .expect("run must not hang on a stalled price fetch")
    .unwrap();

    // Rankings survive; every basket's returns are recorded as faults.
    assert_eq!(report.ranked.len(), 2);
    assert!(report.returns.is_empty());
    assert_eq!(report.return_faults.len(), 2);
    assert!(
        report
            .return_faults
            .iter()
            .all(|f| matches!(f.error, GreenblattError::DataFetch(_)))
    );
    assert!(report.portfolio.is_empty());
    assert!(report.summary.is_none());
}

#[tokio::test]
async fn test_empty_universe_is_an_error() {
    let kpis = kpi_source();
    let prices = price_source();
    let context = RunContext::new(&kpis, &prices, config(2)).unwrap();

    let only_energy = vec![instrument(4, "Delta", "Energi")];
    assert!(context.run(&only_energy).await.is_err());
}

#[test]
fn test_invalid_config_rejected() {
    let kpis = kpi_source();
    let prices = price_source();
    let mut config = config(2);
    config.indicators.clear();
    assert!(RunContext::new(&kpis, &prices, config).is_err());
}

#[tokio::test]
async fn test_artifacts_written() {
    let kpis = kpi_source();
    let prices = price_source();
    let context = RunContext::new(&kpis, &prices, config(10)).unwrap();
    let report = context.run(&universe()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let writer = ArtifactWriter::new(dir.path().join("companies_rank"));
    let written = writer.write_all(&report).unwrap();
    assert_eq!(written.len(), 3);

    let text = std::fs::read_to_string(writer.dir().join("magic_rank_2020.json")).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["instrumentId"], 1);
    assert_eq!(rows[0]["position"], 1);
    assert_eq!(rows[0]["name"], "Alpha");
    assert_eq!(rows[0]["compositeScore"], 3.0);
    // Gamma has no P/E in 2020: penalized, written as null.
    assert_eq!(rows[2]["instrumentId"], 3);
    assert!(rows[2]["compositeScore"].is_null());
    assert!(rows[2]["values"]["Earnings Yield"].is_null());
    assert_eq!(rows[2]["values"]["ROC"], 0.2);

    let text = std::fs::read_to_string(writer.dir().join("portfolio.json")).unwrap();
    let portfolio: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(portfolio["years"].as_array().unwrap().len(), 2);
    assert!(portfolio["daily"].as_array().unwrap().len() >= 3);
}
