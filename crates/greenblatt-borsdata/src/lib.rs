//! Börsdata API client for Greenblatt.
//!
//! This crate provides a client for the [Börsdata](https://borsdata.se/) REST
//! API and implements the [`KpiSource`](greenblatt_traits::KpiSource) and
//! [`PriceSource`](greenblatt_traits::PriceSource) seams on top of it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use greenblatt_borsdata::BorsdataClient;
//! use greenblatt_traits::{InstrumentId, PriceAggregation, ReportPeriod};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BorsdataClient::from_env()?;
//!
//!     // Instruments joined with market, sector and country names
//!     let universe = client.instrument_universe().await?;
//!
//!     // Return on capital history
//!     let roc = client
//!         .kpi_history(InstrumentId(97), 36, ReportPeriod::Year, PriceAggregation::Mean)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `BORSDATA_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! BORSDATA_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod source;
mod types;

pub use client::{BorsdataClient, MAX_INSTRUMENTS_PER_PRICE_REQUEST};
pub use error::BorsdataError;
pub use types::*;

/// Result type for Börsdata operations.
pub type Result<T> = std::result::Result<T, BorsdataError>;
