//! Instrument universe filtering.

use greenblatt_traits::Instrument;
use serde::{Deserialize, Serialize};

/// Predicate filter over the instrument reference table.
///
/// An instrument is kept when its market is one of `markets`, its sector is
/// not in `excluded_sectors` and its country matches `country`. An empty
/// `markets` list or an unset `country` accepts everything. After filtering,
/// at most `limit` instruments are kept, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseFilter {
    /// Allowed market (list) names.
    pub markets: Vec<String>,
    /// Sector names to leave out.
    pub excluded_sectors: Vec<String>,
    /// Required country name.
    pub country: Option<String>,
    /// Number of instruments to keep (the company count); `None` keeps all.
    pub limit: Option<usize>,
}

impl Default for UniverseFilter {
    fn default() -> Self {
        Self {
            markets: vec!["Large Cap".to_string(), "Mid Cap".to_string()],
            excluded_sectors: vec![
                "Finans & Fastighet".to_string(),
                "Dagligvaror".to_string(),
                "Energi".to_string(),
                "Kraftförsörjning".to_string(),
            ],
            country: Some("Sverige".to_string()),
            limit: None,
        }
    }
}

impl UniverseFilter {
    /// Filter that accepts every instrument.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            markets: Vec::new(),
            excluded_sectors: Vec::new(),
            country: None,
            limit: None,
        }
    }

    /// Whether a single instrument passes the predicates (ignoring `limit`).
    #[must_use]
    pub fn accepts(&self, instrument: &Instrument) -> bool {
        let market_ok = self.markets.is_empty()
            || instrument
                .market
                .as_ref()
                .is_some_and(|m| self.markets.contains(m));
        let sector_ok = instrument
            .sector
            .as_ref()
            .is_none_or(|s| !self.excluded_sectors.contains(s));
        let country_ok = self
            .country
            .as_ref()
            .is_none_or(|c| instrument.country.as_ref() == Some(c));
        market_ok && sector_ok && country_ok
    }

    /// Apply the filter, keeping input order.
    #[must_use]
    pub fn apply(&self, instruments: &[Instrument]) -> Vec<Instrument> {
        instruments
            .iter()
            .filter(|i| self.accepts(i))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}
