//! KPI panel construction for the Greenblatt ranking engine.
//!
//! This crate turns sparse per-instrument indicator histories into a
//! year-by-instrument [`KpiPanel`](greenblatt_traits::KpiPanel):
//! - Fetches every requested indicator for an instrument from a
//!   [`KpiSource`](greenblatt_traits::KpiSource), each fetch bounded by a timeout
//! - Outer-joins the series by period, filling gaps with `Missing`
//! - Derives reciprocal fields such as earnings yield from P/E
//! - Keeps only the requested year window
//! - Assembles a panel across instruments with bounded concurrency
//!
//! # Example
//!
//! ```ignore
//! use greenblatt_panel::{PanelBuilder, PanelConfig};
//! use greenblatt_traits::YearWindow;
//!
//! let config = PanelConfig::new(
//!     [("ROC".to_string(), 36), ("PE".to_string(), 2)].into(),
//!     YearWindow::new(2015, 2022),
//! );
//! let builder = PanelBuilder::new(&client, config)?;
//! let build = builder.build_panel(&instrument_ids).await;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod builder;
pub mod derived;
pub mod merge;
pub mod registry;

// Re-export key types
pub use builder::{
    DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT, Exclusion, PanelBuild, PanelBuilder, PanelConfig,
};
pub use derived::{EARNINGS_YIELD, PRICE_TO_EARNINGS, ReciprocalField, earnings_yield};
pub use registry::{KpiCategory, KpiInfo, available_kpis, get_kpi_info, kpis_by_category};
