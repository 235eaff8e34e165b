//! Rank-sum composite ranking (the magic formula).

use crate::config::{MIN_USABLE_INSTRUMENTS, RankingConfig};
use crate::dense::DenseRanking;
use crate::ranker::Ranker;
use greenblatt_traits::{
    GreenblattError, KpiPanel, KpiRow, KpiValue, RankedEntry, RankedYear, Result, Year,
};
use ndarray::Array1;
use std::collections::BTreeMap;

/// Ranks instruments by the sum of their per-indicator dense ranks.
///
/// For each configured indicator, instruments are ranked against the values
/// of the *usable* instruments, those with a value for every configured
/// indicator that year. A usable instrument's rank is its dense rank within
/// that set. An instrument missing some indicator still gets a rank for the
/// indicators it has, placed by where its value falls in the usable set, and
/// [`WORST_RANK`](greenblatt_traits::WORST_RANK) for the ones it lacks, so its
/// composite is infinite and it sorts behind every usable instrument.
///
/// Entries are sorted ascending by composite score with a stable sort, so
/// ties keep panel (universe) order, and the list is truncated to `top_n`.
///
/// # Examples
///
/// ```rust,no_run
/// use greenblatt_rank::{MagicFormulaRanker, Ranker, RankingConfig};
/// # fn demo(panel: &greenblatt_traits::KpiPanel) -> greenblatt_traits::Result<()> {
/// let ranker = MagicFormulaRanker::new(RankingConfig::default())?;
/// let ranked = ranker.rank_year(panel, 2020)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MagicFormulaRanker {
    config: RankingConfig,
}

impl MagicFormulaRanker {
    /// Create a ranker with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: RankingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The ranker's configuration.
    #[must_use]
    pub const fn config(&self) -> &RankingConfig {
        &self.config
    }

    fn is_usable(&self, row: &KpiRow) -> bool {
        self.config
            .rules
            .iter()
            .all(|rule| !row.get(&rule.name).is_missing())
    }
}

impl Ranker for MagicFormulaRanker {
    fn rank_year(&self, panel: &KpiPanel, year: Year) -> Result<RankedYear> {
        let rows = panel.rows_for_year(year);
        let usable: Vec<&KpiRow> = rows.iter().copied().filter(|r| self.is_usable(r)).collect();

        if usable.len() < self.config.min_instruments.max(MIN_USABLE_INSTRUMENTS) {
            return Err(GreenblattError::InsufficientYearData {
                year,
                usable: usable.len(),
            });
        }

        let mut composite = Array1::<f64>::zeros(rows.len());
        let mut columns = Vec::with_capacity(self.config.rules.len());

        for rule in &self.config.rules {
            let values: Vec<KpiValue> = rows.iter().map(|r| r.get(&rule.name)).collect();
            let ranking = DenseRanking::new(
                usable.iter().filter_map(|r| r.get(&rule.name).value()),
                rule.direction,
            );
            let ranks = ranking.rank(&values);
            composite += &ranks;
            columns.push((rule.name.as_str(), values, ranks));
        }

        let mut entries: Vec<RankedEntry> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut ranks = BTreeMap::new();
                let mut values = BTreeMap::new();
                for (name, column_values, column_ranks) in &columns {
                    ranks.insert((*name).to_string(), column_ranks[i]);
                    values.insert((*name).to_string(), column_values[i]);
                }
                RankedEntry {
                    instrument: row.instrument,
                    composite_score: composite[i],
                    ranks,
                    values,
                }
            })
            .collect();

        entries.sort_by(|a, b| a.composite_score.total_cmp(&b.composite_score));
        entries.truncate(self.config.top_n);

        Ok(RankedYear { year, entries })
    }

    fn name(&self) -> &str {
        "magic_formula"
    }
}
