//! Greenblatt CLI binary.
//!
//! Provides the command-line interface for magic formula ranking and basket
//! return evaluation.

mod cmd;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use greenblatt::config::{MAX_COMPANIES, MAX_YEAR, MIN_YEAR};
use greenblatt::eval::DailyReturnPolicy;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "greenblatt")]
#[command(about = "Magic formula ranking and basket return evaluation", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the universe year by year and evaluate each year's basket
    Run(RunArgs),

    /// Print the filtered instrument universe
    Universe {
        #[command(flatten)]
        universe: UniverseArgs,
    },

    /// List known KPIs, or the entries of a KPI table
    Kpis {
        /// JSON KPI table (`{"ROC": 36, ...}`)
        #[arg(long)]
        kpi_table: Option<PathBuf>,
    },
}

/// Universe selection flags shared by `run` and `universe`.
#[derive(Args, Clone, Debug)]
struct UniverseArgs {
    /// Number of companies to keep, 1..=600 or "all"
    #[arg(short, long, value_parser = parse_company_count)]
    companies: Option<CompanyCount>,

    /// Allowed markets (replaces the default Large Cap, Mid Cap)
    #[arg(long, value_delimiter = ',')]
    markets: Vec<String>,

    /// Sectors to exclude (replaces the default list)
    #[arg(long, value_delimiter = ',')]
    exclude_sectors: Vec<String>,

    /// Country to keep
    #[arg(long)]
    country: Option<String>,
}

#[derive(Args, Clone, Debug)]
struct RunArgs {
    /// First year to rank
    #[arg(long, value_parser = year_parser())]
    start: Option<i32>,

    /// Last year to rank
    #[arg(long, value_parser = year_parser())]
    end: Option<i32>,

    /// JSON run configuration used as the base for the other flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON KPI table to pick `--kpis` from
    #[arg(long, requires = "kpis")]
    kpi_table: Option<PathBuf>,

    /// KPI names to fetch, looked up in `--kpi-table`
    #[arg(long, value_delimiter = ',')]
    kpis: Vec<String>,

    /// Instruments kept per ranked year
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Instruments fetched concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Timeout for each KPI fetch, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Daily return definition
    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Years between ranking a basket and holding it
    #[arg(long)]
    holding_offset: Option<i32>,

    /// Directory for ranking and portfolio artifacts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    universe: UniverseArgs,
}

fn year_parser() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR))
}

/// Parsed `--companies` value.
#[derive(Clone, Copy, Debug)]
enum CompanyCount {
    All,
    Limit(usize),
}

impl CompanyCount {
    const fn limit(self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Limit(n) => Some(n),
        }
    }
}

fn parse_company_count(s: &str) -> std::result::Result<CompanyCount, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(CompanyCount::All);
    }
    let n: usize = s
        .parse()
        .map_err(|_| format!("expected a number or \"all\", got {s}"))?;
    if (1..=MAX_COMPANIES).contains(&n) {
        Ok(CompanyCount::Limit(n))
    } else {
        Err(format!("company count must be between 1 and {MAX_COMPANIES}"))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// (close - open) / open of the same day
    Intraday,
    /// close / previous close - 1
    CloseToClose,
}

impl From<Policy> for DailyReturnPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Intraday => Self::Intraday,
            Policy::CloseToClose => Self::CloseToClose,
        }
    }
}

fn init_tracing(verbose: bool) {
    // Targets match by prefix, so this covers every greenblatt_* crate.
    let default = if verbose {
        "greenblatt=debug"
    } else {
        "greenblatt=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => cmd::run::run(args).await?,
        Commands::Universe { universe } => cmd::universe::list_universe(&universe).await?,
        Commands::Kpis { kpi_table } => cmd::kpis::list_kpis(kpi_table.as_deref())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_company_count() {
        assert!(matches!(parse_company_count("all"), Ok(CompanyCount::All)));
        assert!(matches!(parse_company_count("25"), Ok(CompanyCount::Limit(25))));
        assert!(parse_company_count("0").is_err());
        assert!(parse_company_count("601").is_err());
        assert!(parse_company_count("ten").is_err());
    }

    #[test]
    fn test_year_range_enforced() {
        assert!(Cli::try_parse_from(["greenblatt", "run", "--start", "1989"]).is_err());
        assert!(
            Cli::try_parse_from(["greenblatt", "run", "--start", "2015", "--end", "2022"]).is_ok()
        );
    }
}
