//! Börsdata API client implementation.

use crate::{
    Result,
    error::BorsdataError,
    types::{
        CountriesResponse, InstrumentRecord, InstrumentStockPrices, InstrumentsResponse,
        KpiHistoryResponse, Market, MarketsResponse, NamedEntry, SectorsResponse,
        StockPricesArrayResponse,
    },
};
use greenblatt_traits::{Instrument, InstrumentId, PriceAggregation, ReportPeriod};
use reqwest::Client;
use std::{collections::HashMap, env, time::Duration};
use tracing::{debug, warn};

/// Base URL for the Börsdata v1 API.
const BORSDATA_BASE_URL: &str = "https://apiservice.borsdata.se/v1";

/// Most instruments the stock price array endpoint accepts per request.
pub const MAX_INSTRUMENTS_PER_PRICE_REQUEST: usize = 50;

/// Attempts made for a request that keeps hitting the rate limit.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Pause before retrying a rate-limited request.
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Upper bound on a single HTTP request, connect to last byte.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Börsdata API client.
#[derive(Debug, Clone)]
pub struct BorsdataClient {
    client: Client,
    api_key: String,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl BorsdataClient {
    /// Create a new Börsdata client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Create a new client from the `BORSDATA_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("BORSDATA_API_KEY").map_err(|_| BorsdataError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Set how rate-limited requests are retried.
    ///
    /// `max_attempts` counts the first request; it is clamped to at least one.
    #[must_use]
    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = backoff;
        self
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{BORSDATA_BASE_URL}/{endpoint}&authKey={}", self.api_key)
        } else {
            format!("{BORSDATA_BASE_URL}/{endpoint}?authKey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    ///
    /// HTTP 429 is retried after a fixed pause, up to the configured number
    /// of attempts.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);

        for attempt in 1..=self.max_attempts {
            let response = self.client.get(&url).send().await?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!(endpoint, attempt, "Rate limited by Börsdata, backing off");
                tokio::time::sleep(self.retry_backoff).await;
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(BorsdataError::Api(format!("HTTP {status}: {text}")));
            }

            let text = response.text().await?;
            return serde_json::from_str(&text).map_err(|e| {
                BorsdataError::Json(serde_json::Error::io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Failed to parse: {e}. Response: {text}"),
                )))
            });
        }

        Err(BorsdataError::RateLimitExceeded(self.max_attempts))
    }

    /// List all Nordic instruments.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn instruments(&self) -> Result<Vec<InstrumentRecord>> {
        let response: InstrumentsResponse = self.get("instruments").await?;
        Ok(response.instruments)
    }

    /// List all markets.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn markets(&self) -> Result<Vec<Market>> {
        let response: MarketsResponse = self.get("markets").await?;
        Ok(response.markets)
    }

    /// List all sectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn sectors(&self) -> Result<Vec<NamedEntry>> {
        let response: SectorsResponse = self.get("sectors").await?;
        Ok(response.sectors)
    }

    /// List all countries.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn countries(&self) -> Result<Vec<NamedEntry>> {
        let response: CountriesResponse = self.get("countries").await?;
        Ok(response.countries)
    }

    /// Instruments joined with their market, sector and country names, in
    /// API order.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the reference requests fails.
    pub async fn instrument_universe(&self) -> Result<Vec<Instrument>> {
        let (instruments, markets, sectors, countries) = tokio::join!(
            self.instruments(),
            self.markets(),
            self.sectors(),
            self.countries(),
        );

        let markets: HashMap<u32, String> =
            markets?.into_iter().map(|m| (m.id, m.name)).collect();
        let sectors: HashMap<u32, String> =
            sectors?.into_iter().map(|s| (s.id, s.name)).collect();
        let countries: HashMap<u32, String> =
            countries?.into_iter().map(|c| (c.id, c.name)).collect();

        let lookup = |table: &HashMap<u32, String>, id: Option<u32>| {
            id.and_then(|id| table.get(&id).cloned())
        };

        let universe: Vec<Instrument> = instruments?
            .into_iter()
            .map(|record| Instrument {
                id: InstrumentId(record.ins_id),
                market: lookup(&markets, record.market_id),
                sector: lookup(&sectors, record.sector_id),
                country: lookup(&countries, record.country_id),
                name: record.name,
                ticker: record.ticker,
            })
            .collect();

        debug!(instruments = universe.len(), "Loaded instrument universe");
        Ok(universe)
    }

    /// Get the history of one KPI for one instrument.
    ///
    /// # Arguments
    ///
    /// * `instrument` - Börsdata instrument id
    /// * `kpi` - Börsdata KPI id (e.g. 36 for return on capital)
    /// * `period` - Report type (year, r12, quarter)
    /// * `aggregation` - Price type the KPI is computed against
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn kpi_history(
        &self,
        instrument: InstrumentId,
        kpi: u32,
        period: ReportPeriod,
        aggregation: PriceAggregation,
    ) -> Result<KpiHistoryResponse> {
        let endpoint = format!(
            "instruments/{instrument}/kpis/{kpi}/{}/{}/history",
            period.as_str(),
            aggregation.as_str()
        );
        self.get(&endpoint).await
    }

    /// Get daily stock prices for several instruments.
    ///
    /// Requests are split into chunks of at most
    /// [`MAX_INSTRUMENTS_PER_PRICE_REQUEST`] instruments and sent one after
    /// another.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    pub async fn stock_prices(
        &self,
        instruments: &[InstrumentId],
    ) -> Result<Vec<InstrumentStockPrices>> {
        let mut all = Vec::with_capacity(instruments.len());
        for chunk in instruments.chunks(MAX_INSTRUMENTS_PER_PRICE_REQUEST) {
            let endpoint = stock_prices_endpoint(chunk);
            let response: StockPricesArrayResponse = self.get(&endpoint).await?;
            debug!(
                requested = chunk.len(),
                returned = response.stock_prices_array_list.len(),
                "Fetched stock price batch"
            );
            all.extend(response.stock_prices_array_list);
        }
        Ok(all)
    }
}

fn stock_prices_endpoint(instruments: &[InstrumentId]) -> String {
    let list = instruments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("instruments/stockprices?instList={list}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = BorsdataClient::new("test_key");
        assert_eq!(
            client.url("instruments"),
            "https://apiservice.borsdata.se/v1/instruments?authKey=test_key"
        );
        assert_eq!(
            client.url("instruments/stockprices?instList=1,2"),
            "https://apiservice.borsdata.se/v1/instruments/stockprices?instList=1,2&authKey=test_key"
        );
    }

    #[test]
    fn test_stock_prices_endpoint() {
        let ids = [InstrumentId(3), InstrumentId(97), InstrumentId(750)];
        assert_eq!(
            stock_prices_endpoint(&ids),
            "instruments/stockprices?instList=3,97,750"
        );
    }

    #[test]
    fn test_with_retry_clamps_attempts() {
        let client = BorsdataClient::new("k").with_retry(0, Duration::from_millis(10));
        assert_eq!(client.max_attempts, 1);
        assert_eq!(client.retry_backoff, Duration::from_millis(10));
    }
}
