//! Core trait definition for composite rankers.

use greenblatt_traits::{GreenblattError, KpiPanel, RankedYear, Result, Year};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A year that could not be ranked, with the reason.
#[derive(Debug)]
pub struct SkippedYear {
    /// Year that was skipped.
    pub year: Year,
    /// Why it was skipped.
    pub error: GreenblattError,
}

/// Result of ranking every year of a panel.
#[derive(Debug, Default)]
pub struct RankingOutcome {
    /// Ranked years, ascending.
    pub ranked: BTreeMap<Year, RankedYear>,
    /// Years that were skipped, ascending.
    pub skipped: Vec<SkippedYear>,
}

/// Ranks the instruments of a panel year by year.
///
/// All implementations must be thread-safe (Send + Sync) so that years can
/// be ranked in parallel.
///
/// # Examples
///
/// ```rust,no_run
/// use greenblatt_rank::Ranker;
/// use greenblatt_traits::{KpiPanel, RankedYear, Result, Year};
///
/// struct FirstComeRanker;
///
/// impl Ranker for FirstComeRanker {
///     fn rank_year(&self, _panel: &KpiPanel, year: Year) -> Result<RankedYear> {
///         Ok(RankedYear { year, entries: vec![] })
///     }
///
///     fn name(&self) -> &str {
///         "first_come"
///     }
/// }
/// ```
pub trait Ranker: Send + Sync {
    /// Rank the instruments of one year.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::InsufficientYearData`] when the year cannot
    /// be ranked meaningfully.
    fn rank_year(&self, panel: &KpiPanel, year: Year) -> Result<RankedYear>;

    /// Get the name of this ranking strategy.
    fn name(&self) -> &str;

    /// Rank every year present in the panel.
    ///
    /// Years are independent and ranked in parallel. A year that fails is
    /// recorded in [`RankingOutcome::skipped`] and logged; it never aborts the
    /// others.
    fn rank_all(&self, panel: &KpiPanel) -> RankingOutcome
    where
        Self: Sized,
    {
        let results: Vec<(Year, Result<RankedYear>)> = panel
            .years()
            .into_par_iter()
            .map(|year| (year, self.rank_year(panel, year)))
            .collect();

        let mut outcome = RankingOutcome::default();
        for (year, result) in results {
            match result {
                Ok(ranked) => {
                    debug!(
                        ranker = self.name(),
                        year,
                        entries = ranked.len(),
                        "Ranked year"
                    );
                    outcome.ranked.insert(year, ranked);
                }
                Err(error) => {
                    warn!(ranker = self.name(), year, %error, "Skipping year");
                    outcome.skipped.push(SkippedYear { year, error });
                }
            }
        }
        outcome
    }
}
