//! Data types for Börsdata API responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One instrument as listed by `/instruments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentRecord {
    /// Instrument id.
    pub ins_id: u32,
    /// Company name.
    pub name: String,
    /// Ticker symbol.
    #[serde(default)]
    pub ticker: String,
    /// Sector id.
    pub sector_id: Option<u32>,
    /// Market id.
    pub market_id: Option<u32>,
    /// Country id.
    pub country_id: Option<u32>,
    /// Instrument type (0 = share).
    #[serde(default)]
    pub instrument: Option<u32>,
}

/// Response of `/instruments`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstrumentsResponse {
    pub(crate) instruments: Vec<InstrumentRecord>,
}

/// A market (list), e.g. "Large Cap".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Market id.
    pub id: u32,
    /// Market name.
    pub name: String,
    /// Country the market belongs to.
    pub country_id: Option<u32>,
    /// Whether the market is an index.
    #[serde(default)]
    pub is_index: bool,
}

/// Response of `/markets`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MarketsResponse {
    pub(crate) markets: Vec<Market>,
}

/// An `{id, name}` lookup entry (sectors, countries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntry {
    /// Entry id.
    pub id: u32,
    /// Entry name.
    pub name: String,
}

/// Response of `/sectors`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SectorsResponse {
    pub(crate) sectors: Vec<NamedEntry>,
}

/// Response of `/countries`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CountriesResponse {
    pub(crate) countries: Vec<NamedEntry>,
}

/// One KPI history observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KpiHistoryValue {
    /// Report year.
    pub y: i32,
    /// Report period within the year.
    #[serde(default)]
    pub p: u32,
    /// Value, absent when Börsdata has none.
    pub v: Option<f64>,
}

/// Response of `/instruments/{id}/kpis/{kpi}/{report}/{price}/history`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiHistoryResponse {
    /// KPI id.
    pub kpi_id: Option<u32>,
    /// Observations; missing when the instrument has none.
    #[serde(default)]
    pub values: Vec<KpiHistoryValue>,
}

/// One daily stock price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockPrice {
    /// Trading date.
    pub d: NaiveDate,
    /// Open.
    pub o: Option<f64>,
    /// Close.
    pub c: Option<f64>,
    /// High.
    pub h: Option<f64>,
    /// Low.
    pub l: Option<f64>,
    /// Volume.
    pub v: Option<f64>,
}

/// Daily prices of one instrument in an array response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentStockPrices {
    /// Instrument id.
    pub instrument: u32,
    /// Daily prices.
    #[serde(default)]
    pub stock_prices_list: Vec<StockPrice>,
}

/// Response of `/instruments/stockprices`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockPricesArrayResponse {
    #[serde(default)]
    pub(crate) stock_prices_array_list: Vec<InstrumentStockPrices>,
}
