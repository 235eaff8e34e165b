//! Composite ranking engine for Greenblatt.
//!
//! Instruments are ranked per year on each configured indicator, the ranks
//! are summed into a composite score, and the best `top_n` instruments form
//! that year's basket. Missing values carry an infinite penalty rank, which
//! pushes incomplete instruments behind every complete one.
//!
//! # Examples
//!
//! ```rust,no_run
//! use greenblatt_rank::{MagicFormulaRanker, Ranker, RankingConfig};
//! # fn demo(panel: &greenblatt_traits::KpiPanel) -> greenblatt_traits::Result<()> {
//! let ranker = MagicFormulaRanker::new(RankingConfig::default())?;
//! let outcome = ranker.rank_all(panel);
//! for (year, ranked) in &outcome.ranked {
//!     println!("{year}: {:?}", ranked.instruments());
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod dense;
mod magic_formula;
mod ranker;

// Re-export main types
pub use config::{DEFAULT_TOP_N, IndicatorRule, MIN_USABLE_INSTRUMENTS, RankingConfig};
pub use dense::DenseRanking;
pub use magic_formula::MagicFormulaRanker;
pub use ranker::{Ranker, RankingOutcome, SkippedYear};
