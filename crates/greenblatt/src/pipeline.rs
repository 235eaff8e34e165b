//! Run orchestration: filter, build, rank, price, evaluate.

use crate::config::RunConfig;
use greenblatt_eval::{PerformanceSummary, ReturnEngine, ReturnReport};
use greenblatt_panel::{Exclusion, PanelBuilder};
use greenblatt_rank::{MagicFormulaRanker, Ranker, SkippedYear};
use greenblatt_traits::{
    GreenblattError, Instrument, InstrumentId, KpiSource, PriceSource, RankedYear, Result,
    ReturnSeries, Year,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

/// Returns of one ranked year's basket.
#[derive(Debug, Clone)]
pub struct BasketReturns {
    /// Year the basket was ranked in.
    pub ranked_year: Year,
    /// Instruments held, in rank order.
    pub basket: Vec<InstrumentId>,
    /// Returns over the holding year.
    pub report: ReturnReport,
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Instruments that passed the universe filter, in universe order.
    pub universe: Vec<Instrument>,
    /// Instruments left out of the panel.
    pub excluded: Vec<Exclusion>,
    /// Ranked years, ascending.
    pub ranked: BTreeMap<Year, RankedYear>,
    /// Years that could not be ranked.
    pub skipped_years: Vec<SkippedYear>,
    /// Basket returns keyed by holding year.
    pub returns: BTreeMap<Year, BasketReturns>,
    /// Ranked years whose basket returns could not be computed.
    pub return_faults: Vec<SkippedYear>,
    /// Daily portfolio returns of all holding years chained together.
    pub portfolio: ReturnSeries,
    /// Statistics of the chained portfolio series.
    pub summary: Option<PerformanceSummary>,
}

impl RunReport {
    /// Look up a universe instrument by id.
    #[must_use]
    pub fn instrument(&self, id: InstrumentId) -> Option<&Instrument> {
        self.universe.iter().find(|i| i.id == id)
    }
}

/// Per-run context holding the data sources and configuration.
///
/// Built once per run; nothing is carried over between runs.
#[derive(Debug)]
pub struct RunContext<'a, K, P> {
    kpis: &'a K,
    prices: &'a P,
    config: RunConfig,
}

impl<'a, K: KpiSource, P: PriceSource> RunContext<'a, K, P> {
    /// Create a run context.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::InvalidConfig`] if the configuration is invalid.
    pub fn new(kpis: &'a K, prices: &'a P, config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            kpis,
            prices,
            config,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the whole pipeline over `instruments`.
    ///
    /// Faults local to one instrument or one year are logged and recorded in
    /// the report; they never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if no instrument passes the universe filter, or if
    /// the configuration is rejected by one of the engines.
    pub async fn run(&self, instruments: &[Instrument]) -> Result<RunReport> {
        let universe = self.config.universe.apply(instruments);
        if universe.is_empty() {
            return Err(GreenblattError::InvalidData(
                "no instrument passed the universe filter".into(),
            ));
        }
        info!(
            instruments = universe.len(),
            start = self.config.window.start,
            end = self.config.window.end,
            "Starting run"
        );

        let ids: Vec<InstrumentId> = universe.iter().map(|i| i.id).collect();
        let builder = PanelBuilder::new(self.kpis, self.config.panel_config())?;
        let build = builder.build_panel(&ids).await;

        let ranker = MagicFormulaRanker::new(self.config.ranking.clone())?;
        let outcome = ranker.rank_all(&build.panel);
        for skipped in &outcome.skipped {
            info!(year = skipped.year, reason = %skipped.error, "Year not ranked");
        }

        let engine = ReturnEngine::new(self.config.returns);
        let mut returns = BTreeMap::new();
        let mut return_faults = Vec::new();

        for (&year, ranked) in &outcome.ranked {
            let basket = ranked.instruments();
            let holding_year = year + self.config.holding_offset;
            info!(year, holding_year, basket = ?basket, "Top ranked basket");

            match self.basket_returns(&engine, &basket, holding_year).await {
                Ok(report) => {
                    info!(
                        year = holding_year,
                        annual_return = report.annual_return,
                        average_annual_return = report.average_annual_return,
                        "Portfolio annual return"
                    );
                    returns.insert(
                        holding_year,
                        BasketReturns {
                            ranked_year: year,
                            basket,
                            report,
                        },
                    );
                }
                // A price fetch failing or timing out mid-run only costs that year.
                Err(error)
                    if error.is_local() || matches!(error, GreenblattError::DataFetch(_)) =>
                {
                    warn!(year, holding_year, %error, "Basket returns unavailable");
                    return_faults.push(SkippedYear { year, error });
                }
                Err(error) => return Err(error),
            }
        }

        let portfolio = ReturnSeries::chain(returns.values().map(|r| &r.report.series));
        let summary =
            (!portfolio.is_empty()).then(|| PerformanceSummary::from_series(&portfolio));
        if let Some(summary) = &summary {
            info!(
                trading_days = summary.trading_days,
                total_return = summary.total_return,
                max_drawdown = summary.max_drawdown,
                "Portfolio summary"
            );
        }

        Ok(RunReport {
            universe,
            excluded: build.excluded,
            ranked: outcome.ranked,
            skipped_years: outcome.skipped,
            returns,
            return_faults,
            portfolio,
            summary,
        })
    }

    async fn basket_returns(
        &self,
        engine: &ReturnEngine,
        basket: &[InstrumentId],
        year: Year,
    ) -> Result<ReturnReport> {
        let limit = Duration::from_secs(self.config.fetch_timeout_secs);
        let bars = tokio::time::timeout(limit, self.prices.fetch_daily_prices(basket))
            .await
            .map_err(|_| {
                GreenblattError::DataFetch(format!("price fetch timed out after {limit:?}"))
            })??;
        engine.compute_returns(&bars, year)
    }
}
