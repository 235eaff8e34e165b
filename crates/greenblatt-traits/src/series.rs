//! Daily portfolio return series.

use crate::types::{Date, Year};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// One day of a portfolio return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPoint {
    /// Trading date.
    pub date: Date,
    /// Equal-weighted portfolio return for the day.
    pub daily_return: f64,
    /// `1 + daily_return`.
    pub growth: f64,
    /// Running product of `growth` from the start of the series.
    pub cumulative: f64,
}

/// Date-ordered daily portfolio returns with compounded growth.
///
/// Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    /// Build a series from date-ordered daily returns.
    pub fn from_daily_returns<I>(returns: I) -> Self
    where
        I: IntoIterator<Item = (Date, f64)>,
    {
        let mut cumulative = 1.0;
        let points = returns
            .into_iter()
            .map(|(date, daily_return)| {
                let growth = 1.0 + daily_return;
                cumulative *= growth;
                ReturnPoint {
                    date,
                    daily_return,
                    growth,
                    cumulative,
                }
            })
            .collect();
        Self { points }
    }

    /// Concatenate consecutive series into one whose cumulative growth
    /// compounds across all of them.
    ///
    /// Points dated on or before the last date already taken are dropped.
    pub fn chain<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut last: Option<Date> = None;
        let mut daily = Vec::new();
        for s in series {
            for p in &s.points {
                if last.is_none_or(|d| p.date > d) {
                    daily.push((p.date, p.daily_return));
                    last = Some(p.date);
                }
            }
        }
        Self::from_daily_returns(daily)
    }

    /// Points in date order.
    #[must_use]
    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    /// Daily returns in date order.
    #[must_use]
    pub fn daily_returns(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.daily_return).collect()
    }

    /// Final cumulative growth factor (1.0 for an empty series).
    #[must_use]
    pub fn cumulative_growth(&self) -> f64 {
        self.points.last().map_or(1.0, |p| p.cumulative)
    }

    /// Cumulative return over the whole series.
    #[must_use]
    pub fn cumulative_return(&self) -> f64 {
        self.cumulative_growth() - 1.0
    }

    /// Product of the daily growth factors dated in `year`, or `None` when the
    /// series has no points in that year.
    #[must_use]
    pub fn annual_growth(&self, year: Year) -> Option<f64> {
        let mut in_year = self.points.iter().filter(|p| p.date.year() == year).peekable();
        in_year.peek()?;
        Some(in_year.map(|p| p.growth).product())
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_compounding() {
        let s = ReturnSeries::from_daily_returns([(d(2021, 1, 4), 0.10), (d(2021, 1, 5), -0.10)]);
        assert_relative_eq!(s.points()[0].cumulative, 1.10, epsilon = 1e-12);
        assert_relative_eq!(s.cumulative_growth(), 0.99, epsilon = 1e-12);
        assert_relative_eq!(s.cumulative_return(), -0.01, epsilon = 1e-12);
        assert_relative_eq!(s.annual_growth(2021).unwrap(), 0.99, epsilon = 1e-12);
        assert!(s.annual_growth(2020).is_none());
    }

    #[test]
    fn test_chain_compounds_across_years() {
        let a = ReturnSeries::from_daily_returns([(d(2020, 12, 30), 0.5)]);
        let b = ReturnSeries::from_daily_returns([(d(2021, 1, 4), 0.5)]);
        let chained = ReturnSeries::chain([&a, &b]);
        assert_eq!(chained.len(), 2);
        assert_relative_eq!(chained.cumulative_growth(), 2.25, epsilon = 1e-12);
    }

    #[test]
    fn test_chain_drops_overlapping_dates() {
        let a = ReturnSeries::from_daily_returns([(d(2021, 1, 4), 0.1), (d(2021, 1, 5), 0.1)]);
        let b = ReturnSeries::from_daily_returns([(d(2021, 1, 5), 0.9), (d(2021, 1, 6), 0.0)]);
        let chained = ReturnSeries::chain([&a, &b]);
        assert_eq!(chained.len(), 3);
        assert_relative_eq!(chained.cumulative_growth(), 1.21, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_series() {
        let s = ReturnSeries::default();
        assert!(s.is_empty());
        assert_relative_eq!(s.cumulative_return(), 0.0);
    }
}
