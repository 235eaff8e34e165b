//! Full pipeline command implementation.

use crate::RunArgs;
use crate::cmd::universe::universe_filter;
use anyhow::{Context, Result, bail};
use greenblatt::borsdata::BorsdataClient;
use greenblatt::panel::{EARNINGS_YIELD, PRICE_TO_EARNINGS, available_kpis, get_kpi_info};
use greenblatt::rank::IndicatorRule;
use greenblatt::traits::{IndicatorId, YearWindow};
use greenblatt::{ArtifactWriter, RunConfig, RunContext, RunReport, load_kpi_table, select_kpis};
use std::collections::BTreeMap;
use tracing::info;

/// Rank, evaluate and write artifacts.
pub(crate) async fn run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RunConfig::default(),
    };
    apply_args(&mut config, &args)?;

    let client = BorsdataClient::from_env()?;
    let instruments = client
        .instrument_universe()
        .await
        .context("failed to load the instrument universe from Börsdata")?;
    info!(instruments = instruments.len(), "Loaded instrument universe");

    let writer = ArtifactWriter::new(&config.output_dir);
    let context = RunContext::new(&client, &client, config)?;
    let report = context.run(&instruments).await?;

    let written = writer
        .write_all(&report)
        .with_context(|| format!("failed to write artifacts to {}", writer.dir().display()))?;

    print_report(&report);
    println!("\nWrote {} files to {}", written.len(), writer.dir().display());
    Ok(())
}

/// Apply command-line flags on top of a base configuration.
fn apply_args(config: &mut RunConfig, args: &RunArgs) -> Result<()> {
    // Built directly so a reversed range fails validation instead of being
    // silently swapped.
    config.window = YearWindow {
        start: args.start.unwrap_or(config.window.start),
        end: args.end.unwrap_or(config.window.end),
    };

    if !args.kpis.is_empty() {
        let table = match &args.kpi_table {
            Some(path) => load_kpi_table(path)
                .with_context(|| format!("failed to load KPI table {}", path.display()))?,
            None => registry_table(),
        };
        config.indicators = select_kpis(&table, &args.kpis)?;
        config.ranking.rules = ranking_rules(&config.indicators)?;
    }

    if let Some(top_n) = args.top_n {
        config.ranking.top_n = top_n;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout {
        config.fetch_timeout_secs = timeout;
    }
    if let Some(policy) = args.policy {
        config.returns.policy = policy.into();
    }
    if let Some(offset) = args.holding_offset {
        config.holding_offset = offset;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir.clone_from(dir);
    }
    config.universe = universe_filter(&args.universe, config.universe.clone());

    config.validate()?;
    Ok(())
}

/// KPI table built from the registry's source ids.
fn registry_table() -> BTreeMap<String, IndicatorId> {
    available_kpis()
        .into_iter()
        .filter_map(|kpi| kpi.source_id.map(|id| (kpi.name.to_string(), id)))
        .collect()
}

/// Ranking rules for the selected indicators.
///
/// P/E is ranked through its reciprocal, earnings yield. Every other KPI
/// takes its direction from the registry.
fn ranking_rules(indicators: &BTreeMap<String, IndicatorId>) -> Result<Vec<IndicatorRule>> {
    indicators
        .keys()
        .map(|name| {
            if name == PRICE_TO_EARNINGS {
                return Ok(IndicatorRule::higher_is_better(EARNINGS_YIELD));
            }
            match get_kpi_info(name) {
                Some(info) => Ok(IndicatorRule::new(name.clone(), info.direction)),
                None => bail!("no ranking direction known for KPI {name}"),
            }
        })
        .collect()
}

fn print_report(report: &RunReport) {
    println!("\nUniverse: {} instruments", report.universe.len());
    if !report.excluded.is_empty() {
        println!("Excluded: {} instruments without KPI data", report.excluded.len());
    }
    for skipped in &report.skipped_years {
        println!("Skipped {}: {}", skipped.year, skipped.error);
    }

    for (year, returns) in &report.returns {
        let tickers: Vec<&str> = returns
            .basket
            .iter()
            .map(|id| report.instrument(*id).map_or("?", |i| i.ticker.as_str()))
            .collect();
        println!(
            "\n{year} (ranked {}): {:+.2}%",
            returns.ranked_year,
            returns.report.annual_return * 100.0
        );
        if let Some(average) = returns.report.average_annual_return {
            println!("  Average instrument return: {:+.2}%", average * 100.0);
        }
        println!("  Basket: {}", tickers.join(", "));
    }
    for fault in &report.return_faults {
        println!("\nNo returns for basket ranked {}: {}", fault.year, fault.error);
    }

    if let Some(summary) = &report.summary {
        println!("\nCumulative return: {:+.2}%", summary.total_return * 100.0);
        if let Some(vol) = summary.annualized_volatility {
            println!("Annualized volatility: {:.2}%", vol * 100.0);
        }
        if let Some(sharpe) = summary.sharpe_ratio {
            println!("Sharpe ratio: {sharpe:.2}");
        }
        println!("Max drawdown: {:.2}%", summary.max_drawdown * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenblatt::traits::Direction;

    #[test]
    fn test_ranking_rules_for_magic_formula() {
        let indicators = BTreeMap::from([("ROC".to_string(), 36), ("PE".to_string(), 2)]);
        let rules = ranking_rules(&indicators).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.contains(&IndicatorRule::higher_is_better(EARNINGS_YIELD)));
        assert!(rules.contains(&IndicatorRule::higher_is_better("ROC")));
    }

    #[test]
    fn test_ranking_rules_use_registry_direction() {
        let indicators = BTreeMap::from([("EV/EBIT".to_string(), 10)]);
        let rules = ranking_rules(&indicators).unwrap();
        assert_eq!(rules[0].direction, Direction::LowerIsBetter);

        let unknown = BTreeMap::from([("Dividend".to_string(), 7)]);
        assert!(ranking_rules(&unknown).is_err());
    }

    #[test]
    fn test_registry_table_has_source_ids_only() {
        let table = registry_table();
        assert_eq!(table["ROC"], 36);
        assert!(!table.contains_key(EARNINGS_YIELD));
    }
}
