//! Dense ranking against a reference set of values.

use greenblatt_traits::{Direction, KpiValue, WORST_RANK};
use ndarray::Array1;

/// Sorted distinct values an indicator is ranked against.
///
/// The rank of a value is one plus the number of distinct reference values
/// strictly better than it. For members of the reference set this is the
/// usual dense rank: 1 is best, ties share a rank and no rank is skipped.
#[derive(Debug, Clone)]
pub struct DenseRanking {
    distinct: Vec<f64>,
    direction: Direction,
}

impl DenseRanking {
    /// Build a ranking from reference values.
    pub fn new<I>(values: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut distinct: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        Self {
            distinct,
            direction,
        }
    }

    /// Number of distinct reference values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.distinct.len()
    }

    /// Whether the reference set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distinct.is_empty()
    }

    /// Rank of a single value.
    #[must_use]
    pub fn rank_of(&self, value: f64) -> f64 {
        let better = match self.direction {
            Direction::HigherIsBetter => {
                self.distinct.len() - self.distinct.partition_point(|&x| x <= value)
            }
            Direction::LowerIsBetter => self.distinct.partition_point(|&x| x < value),
        };
        (better + 1) as f64
    }

    /// Ranks of a column of values; missing values get [`WORST_RANK`].
    #[must_use]
    pub fn rank(&self, values: &[KpiValue]) -> Array1<f64> {
        values
            .iter()
            .map(|v| v.value().map_or(WORST_RANK, |x| self.rank_of(x)))
            .collect()
    }
}
