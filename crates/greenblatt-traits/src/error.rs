//! Error types for the Greenblatt workspace.
//!
//! Faults local to one instrument ([`GreenblattError::FetchFault`],
//! [`GreenblattError::NoData`]) or one year
//! ([`GreenblattError::InsufficientYearData`],
//! [`GreenblattError::YearOutOfRange`], [`GreenblattError::NoDataForYear`])
//! are absorbed and logged by the orchestrator. The remaining variants abort a
//! run.

use crate::types::{IndicatorId, InstrumentId, Year};
use thiserror::Error;

/// The main error type for Greenblatt operations.
#[derive(Debug, Error)]
pub enum GreenblattError {
    /// An upstream fetch for one instrument/indicator failed or timed out.
    #[error("Fetch failed for instrument {instrument}, indicator {indicator}: {reason}")]
    FetchFault {
        /// Instrument being fetched.
        instrument: InstrumentId,
        /// Indicator being fetched.
        indicator: IndicatorId,
        /// Upstream error description.
        reason: String,
    },

    /// An instrument has no usable data for any requested indicator.
    #[error("No KPI data for instrument {0}")]
    NoData(InstrumentId),

    /// Too few instruments with complete data to rank a year.
    #[error("Insufficient data to rank year {year}: {usable} usable instrument(s)")]
    InsufficientYearData {
        /// Year that was skipped.
        year: Year,
        /// Instruments with complete data that year.
        usable: usize,
    },

    /// The requested year lies outside the price data.
    #[error("Year {year} out of range: price data covers {min} to {max}")]
    YearOutOfRange {
        /// Requested year.
        year: Year,
        /// First year present in the data.
        min: Year,
        /// Last year present in the data.
        max: Year,
    },

    /// No trading days with usable prices in the requested year.
    #[error("No price data for year {0}")]
    NoDataForYear(Year),

    /// An instrument was appended to a panel twice.
    #[error("Instrument {0} already present in panel")]
    DuplicateInstrument(InstrumentId),

    /// Invalid configuration or caller arguments.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error fetching data from an external source.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// Filesystem error while writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while writing artifacts.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl GreenblattError {
    /// Whether the error is local to one instrument or one year and should be
    /// absorbed rather than abort the run.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::FetchFault { .. }
                | Self::NoData(_)
                | Self::InsufficientYearData { .. }
                | Self::YearOutOfRange { .. }
                | Self::NoDataForYear(_)
        )
    }
}

impl From<String> for GreenblattError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GreenblattError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Greenblatt operations.
pub type Result<T> = std::result::Result<T, GreenblattError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GreenblattError::YearOutOfRange {
            year: 2030,
            min: 2015,
            max: 2022,
        };
        assert_eq!(
            err.to_string(),
            "Year 2030 out of range: price data covers 2015 to 2022"
        );

        let err = GreenblattError::NoData(InstrumentId(7));
        assert_eq!(err.to_string(), "No KPI data for instrument 7");
    }

    #[test]
    fn test_error_from_string() {
        let err: GreenblattError = "boom".into();
        assert!(matches!(err, GreenblattError::Other(_)));
    }

    #[test]
    fn test_local_classification() {
        assert!(GreenblattError::NoDataForYear(2020).is_local());
        assert!(
            GreenblattError::InsufficientYearData {
                year: 2020,
                usable: 1
            }
            .is_local()
        );
        assert!(!GreenblattError::InvalidConfig("x".into()).is_local());
        assert!(!GreenblattError::DataFetch("down".into()).is_local());
    }
}
