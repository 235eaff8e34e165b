//! Universe listing command implementation.

use crate::UniverseArgs;
use anyhow::{Context, Result};
use greenblatt::UniverseFilter;
use greenblatt::borsdata::BorsdataClient;

/// Apply the universe flags on top of `base`.
pub(crate) fn universe_filter(args: &UniverseArgs, base: UniverseFilter) -> UniverseFilter {
    let mut filter = base;
    if let Some(count) = args.companies {
        filter.limit = count.limit();
    }
    if !args.markets.is_empty() {
        filter.markets.clone_from(&args.markets);
    }
    if !args.exclude_sectors.is_empty() {
        filter.excluded_sectors.clone_from(&args.exclude_sectors);
    }
    if let Some(country) = &args.country {
        filter.country = Some(country.clone());
    }
    filter
}

/// Print the instruments that pass the universe filter.
pub(crate) async fn list_universe(args: &UniverseArgs) -> Result<()> {
    let client = BorsdataClient::from_env()?;
    let instruments = client
        .instrument_universe()
        .await
        .context("failed to load the instrument universe from Börsdata")?;

    let filter = universe_filter(args, UniverseFilter::default());
    let kept = filter.apply(&instruments);

    println!(
        "{:>6}  {:<10} {:<32} {:<12} {:<24}",
        "Id", "Ticker", "Name", "Market", "Sector"
    );
    println!("{}", "-".repeat(88));
    for instrument in &kept {
        println!(
            "{:>6}  {:<10} {:<32} {:<12} {:<24}",
            instrument.id,
            instrument.ticker,
            instrument.name,
            instrument.market.as_deref().unwrap_or("-"),
            instrument.sector.as_deref().unwrap_or("-"),
        );
    }
    println!("\n{} of {} instruments", kept.len(), instruments.len());

    Ok(())
}
