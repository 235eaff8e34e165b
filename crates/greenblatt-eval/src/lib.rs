//! Basket return evaluation for Greenblatt.
//!
//! This crate turns the daily prices of a ranked basket into returns:
//! - Per-instrument annual return from first to last close of the year
//! - Equal-weighted daily portfolio returns over a date-pivoted price table
//! - Compounded growth and the annual portfolio return
//! - Performance statistics (volatility, Sharpe, max drawdown)
//!
//! # Example
//!
//! ```rust,ignore
//! use greenblatt_eval::{PerformanceSummary, compute_returns};
//!
//! let report = compute_returns(&bars, 2021)?;
//! println!("annual return: {:.2}%", report.annual_return * 100.0);
//!
//! let summary = PerformanceSummary::from_series(&report.series);
//! ```

pub mod returns;
pub mod summary;

// Re-export main types
pub use returns::{
    DailyReturnPolicy, PricePivot, ReturnConfig, ReturnEngine, ReturnReport, compute_returns,
};
pub use summary::{
    PerformanceSummary, TRADING_DAYS_PER_YEAR, calculate_max_drawdown, calculate_sharpe,
    calculate_volatility,
};
