//! Performance summary of a portfolio return series.

use greenblatt_traits::ReturnSeries;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Trading days used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Headline statistics of a [`ReturnSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// Number of daily observations.
    pub trading_days: usize,
    /// Compounded return over the whole series.
    pub total_return: f64,
    /// Total return scaled to one year of trading days.
    pub annualized_return: Option<f64>,
    /// Sample standard deviation of daily returns, annualized.
    pub annualized_volatility: Option<f64>,
    /// Annualized mean over standard deviation of daily returns.
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough decline of the growth curve, as a fraction.
    pub max_drawdown: f64,
}

impl PerformanceSummary {
    /// Summarize a series.
    #[must_use]
    pub fn from_series(series: &ReturnSeries) -> Self {
        let returns = series.daily_returns();
        let growth: Vec<f64> = series.points().iter().map(|p| p.cumulative).collect();
        let trading_days = returns.len();
        let total_return = series.cumulative_return();

        let annualized_return = (trading_days > 0).then(|| {
            series
                .cumulative_growth()
                .powf(TRADING_DAYS_PER_YEAR as f64 / trading_days as f64)
                - 1.0
        });

        Self {
            trading_days,
            total_return,
            annualized_return,
            annualized_volatility: calculate_volatility(&returns, TRADING_DAYS_PER_YEAR),
            sharpe_ratio: calculate_sharpe(&returns, TRADING_DAYS_PER_YEAR),
            max_drawdown: calculate_max_drawdown(&growth),
        }
    }
}

/// Annualized sample volatility of daily returns.
///
/// `None` with fewer than two finite observations.
#[must_use]
pub fn calculate_volatility(returns: &[f64], trading_days_per_year: usize) -> Option<f64> {
    let valid: Array1<f64> = returns.iter().copied().filter(|x| x.is_finite()).collect();
    if valid.len() < 2 {
        return None;
    }
    Some(valid.std(1.0) * (trading_days_per_year as f64).sqrt())
}

/// Annualized Sharpe ratio of daily returns (zero risk-free rate).
///
/// `None` with fewer than two finite observations or zero dispersion.
#[must_use]
pub fn calculate_sharpe(returns: &[f64], trading_days_per_year: usize) -> Option<f64> {
    let valid: Array1<f64> = returns.iter().copied().filter(|x| x.is_finite()).collect();
    if valid.len() < 2 {
        return None;
    }

    let mean = valid.mean()?;
    let std = valid.std(1.0);
    if std == 0.0 {
        None
    } else {
        Some(mean / std * (trading_days_per_year as f64).sqrt())
    }
}

/// Maximum drawdown of a growth curve (cumulative growth factors starting
/// from 1.0).
#[must_use]
pub fn calculate_max_drawdown(growth: &[f64]) -> f64 {
    let mut max_dd = 0.0;
    let mut peak = 1.0;

    for &g in growth {
        if g > peak {
            peak = g;
        }
        let dd = (peak - g) / peak;
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use greenblatt_traits::Date;

    fn series(returns: &[f64]) -> ReturnSeries {
        let start = Date::from_ymd_opt(2020, 1, 1).unwrap();
        ReturnSeries::from_daily_returns(
            returns
                .iter()
                .enumerate()
                .map(|(i, &r)| (start + chrono::Days::new(i as u64), r)),
        )
    }

    #[test]
    fn test_calculate_sharpe() {
        let returns = vec![0.01, -0.005, 0.015, 0.002, -0.003];
        let sharpe = calculate_sharpe(&returns, 252).unwrap();
        assert!(sharpe.is_finite());
        assert!(sharpe > 0.0);

        assert!(calculate_sharpe(&[0.01], 252).is_none());
        assert!(calculate_sharpe(&[0.01, 0.01], 252).is_none());
    }

    #[test]
    fn test_calculate_max_drawdown() {
        let growth = vec![1.0, 1.1, 1.2, 0.9, 1.0, 1.3];
        assert_relative_eq!(calculate_max_drawdown(&growth), 0.25, epsilon = 1e-12);
        assert_relative_eq!(calculate_max_drawdown(&[1.0, 1.1]), 0.0);
    }

    #[test]
    fn test_drawdown_from_first_day_loss() {
        assert_relative_eq!(calculate_max_drawdown(&[0.9]), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_summary_from_series() {
        let summary = PerformanceSummary::from_series(&series(&[0.10, -0.10]));
        assert_eq!(summary.trading_days, 2);
        assert_relative_eq!(summary.total_return, -0.01, epsilon = 1e-12);
        assert_relative_eq!(summary.max_drawdown, 0.1, epsilon = 1e-12);
        assert!(summary.annualized_volatility.unwrap() > 0.0);
    }

    #[test]
    fn test_summary_of_empty_series() {
        let summary = PerformanceSummary::from_series(&ReturnSeries::default());
        assert_eq!(summary.trading_days, 0);
        assert_relative_eq!(summary.total_return, 0.0);
        assert!(summary.annualized_return.is_none());
        assert!(summary.sharpe_ratio.is_none());
    }
}
