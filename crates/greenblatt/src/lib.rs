#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/greenblatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # greenblatt
//!
//! Umbrella crate that re-exports the greenblatt sub-crates and wires them
//! into a run.
//!
//! ## Quick Start
//!
//! ```ignore
//! use greenblatt::{ArtifactWriter, RunConfig, RunContext};
//! use greenblatt::borsdata::BorsdataClient;
//!
//! # async fn example() -> greenblatt::Result<()> {
//! let client = BorsdataClient::from_env()?;
//! let instruments = client.instrument_universe().await?;
//!
//! let config = RunConfig::default();
//! let writer = ArtifactWriter::new(&config.output_dir);
//! let report = RunContext::new(&client, &client, config)?.run(&instruments).await?;
//! writer.write_all(&report)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Shared types, errors and the data-source seams
//! - [`panel`] - KPI panel construction
//! - [`rank`] - Composite ranking
//! - [`eval`] - Basket returns and performance statistics
//! - [`borsdata`] - Börsdata API client
//!
//! ## Pipeline
//!
//! 1. **Universe filter** keeps the instruments of interest
//! 2. **Panel builder** fetches and aligns their KPI histories by year
//! 3. **Ranker** picks each year's top-ranked basket
//! 4. **Return engine** prices each basket over its holding year
//! 5. **Artifacts** record rankings and portfolio returns as JSON

/// Version information for the greenblatt crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod output;
pub mod pipeline;
pub mod universe;

/// Shared types, errors and data-source traits.
pub mod traits {
    pub use greenblatt_traits::*;
}

/// KPI panel construction.
pub mod panel {
    pub use greenblatt_panel::*;
}

/// Composite ranking.
///
/// Instruments are dense-ranked per indicator within each year and the ranks
/// summed; the lowest composite scores form the year's basket.
pub mod rank {
    pub use greenblatt_rank::*;
}

/// Basket return computation and performance statistics.
pub mod eval {
    pub use greenblatt_eval::*;
}

/// Börsdata API client.
///
/// ## Setup
///
/// Set the `BORSDATA_API_KEY` environment variable or add it to a `.env` file.
pub mod borsdata {
    pub use greenblatt_borsdata::*;
}

// Re-export the run surface at top level
pub use config::{RunConfig, load_kpi_table, select_kpis};
pub use output::ArtifactWriter;
pub use pipeline::{BasketReturns, RunContext, RunReport};
pub use universe::UniverseFilter;

// Re-export error types
pub use greenblatt_traits::{GreenblattError, Result};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use greenblatt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::traits::*;
    pub use crate::{ArtifactWriter, RunConfig, RunContext, RunReport, UniverseFilter};
    pub use greenblatt_rank::Ranker;
}
