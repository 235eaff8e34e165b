#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/greenblatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the Greenblatt workspace.
//!
//! This crate provides the data model shared by the panel builder, ranking
//! engine and return engine, together with the data-source seams they are
//! driven through.

/// The version of the greenblatt-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod panel;
pub mod ranked;
pub mod series;
pub mod source;
pub mod types;

// Re-exports
pub use error::{GreenblattError, Result};
pub use panel::{KpiPanel, KpiRow};
pub use ranked::{RankedEntry, RankedYear, WORST_RANK};
pub use series::{ReturnPoint, ReturnSeries};
pub use source::{
    InMemoryKpiSource, InMemoryPriceSource, KpiSource, PriceAggregation, PriceSource,
    ReportPeriod,
};
pub use types::{
    Date, Direction, IndicatorId, IndicatorSeries, Instrument, InstrumentId, KpiValue, Observation,
    PriceBar, Year, YearWindow,
};
