//! Run configuration.

use crate::universe::UniverseFilter;
use greenblatt_eval::ReturnConfig;
use greenblatt_panel::{DEFAULT_CONCURRENCY, PanelConfig};
use greenblatt_rank::RankingConfig;
use greenblatt_traits::{GreenblattError, IndicatorId, Result, YearWindow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Earliest year accepted in a run's window.
pub const MIN_YEAR: i32 = 1990;

/// Latest year accepted in a run's window.
pub const MAX_YEAR: i32 = 2100;

/// Largest company count accepted.
pub const MAX_COMPANIES: usize = 600;

/// Default artifact directory.
pub const DEFAULT_OUTPUT_DIR: &str = "companies_rank";

/// Everything one run needs besides its data sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Years ranked (inclusive).
    pub window: YearWindow,

    /// Indicator name to Börsdata KPI id.
    pub indicators: BTreeMap<String, IndicatorId>,

    /// Ranking rules and basket size.
    pub ranking: RankingConfig,

    /// Daily return definition.
    pub returns: ReturnConfig,

    /// Years between the ranking year and the year the basket is held.
    pub holding_offset: i32,

    /// Instruments fetched concurrently while building the panel.
    pub concurrency: usize,

    /// Upper bound on each indicator fetch, in seconds.
    pub fetch_timeout_secs: u64,

    /// Directory artifacts are written to.
    pub output_dir: PathBuf,

    /// Universe filter, including the company count.
    pub universe: UniverseFilter,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            window: YearWindow::new(2019, 2021),
            indicators: default_indicators(),
            ranking: RankingConfig::default(),
            returns: ReturnConfig::default(),
            holding_offset: 0,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout_secs: 30,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            universe: UniverseFilter::default(),
        }
    }
}

/// `ROC` (KPI 36) and `PE` (KPI 2), the magic formula inputs.
#[must_use]
pub fn default_indicators() -> BTreeMap<String, IndicatorId> {
    BTreeMap::from([("ROC".to_string(), 36), ("PE".to_string(), 2)])
}

impl RunConfig {
    /// Load a configuration from a JSON file. Omitted fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::InvalidConfig`] for a reversed or
    /// out-of-range window, a company count outside `1..=600`, an empty
    /// indicator table, zero concurrency, a zero fetch timeout, an invalid
    /// ranking configuration, or a ranking rule naming a column the panel
    /// never carries.
    pub fn validate(&self) -> Result<()> {
        let YearWindow { start, end } = self.window;
        if start > end {
            return Err(GreenblattError::InvalidConfig(format!(
                "start year {start} is after end year {end}"
            )));
        }
        for year in [start, end] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(GreenblattError::InvalidConfig(format!(
                    "year {year} outside {MIN_YEAR}..={MAX_YEAR}"
                )));
            }
        }
        if let Some(limit) = self.universe.limit
            && !(1..=MAX_COMPANIES).contains(&limit)
        {
            return Err(GreenblattError::InvalidConfig(format!(
                "company count {limit} outside 1..={MAX_COMPANIES}"
            )));
        }
        if self.indicators.is_empty() {
            return Err(GreenblattError::InvalidConfig(
                "at least one indicator must be requested".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(GreenblattError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(GreenblattError::InvalidConfig(
                "fetch_timeout_secs must be at least 1".into(),
            ));
        }
        self.ranking.validate()?;

        let panel = self.panel_config();
        let columns = panel.columns();
        if let Some(rule) = self
            .ranking
            .rules
            .iter()
            .find(|rule| !columns.contains(rule.name.as_str()))
        {
            return Err(GreenblattError::InvalidConfig(format!(
                "ranking indicator {} is neither fetched nor derived",
                rule.name
            )));
        }
        Ok(())
    }

    /// Panel builder settings derived from this configuration.
    #[must_use]
    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            concurrency: self.concurrency,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            ..PanelConfig::new(self.indicators.clone(), self.window)
        }
    }
}

/// Load a KPI table (`{"ROC": 36, "PE": 2, ...}`) from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_kpi_table(path: impl AsRef<Path>) -> Result<BTreeMap<String, IndicatorId>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Pick `names` out of a KPI table, keeping their ids.
///
/// # Errors
///
/// Returns [`GreenblattError::InvalidConfig`] for a name not in the table.
pub fn select_kpis(
    table: &BTreeMap<String, IndicatorId>,
    names: &[String],
) -> Result<BTreeMap<String, IndicatorId>> {
    names
        .iter()
        .map(|name| {
            table
                .get(name)
                .map(|id| (name.clone(), *id))
                .ok_or_else(|| GreenblattError::InvalidConfig(format!("unknown KPI {name}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.indicators["ROC"], 36);
        assert_eq!(config.indicators["PE"], 2);
        assert_eq!(config.output_dir, PathBuf::from("companies_rank"));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(
            Duration::from_secs(config.fetch_timeout_secs),
            greenblatt_panel::DEFAULT_FETCH_TIMEOUT
        );
    }

    #[test]
    fn test_validate_year_range() {
        let reversed = RunConfig {
            window: YearWindow {
                start: 2022,
                end: 2020,
            },
            ..Default::default()
        };
        assert!(reversed.validate().is_err());

        let early = RunConfig {
            window: YearWindow::new(1980, 2020),
            ..Default::default()
        };
        assert!(early.validate().is_err());
    }

    #[test]
    fn test_validate_company_count() {
        let mut config = RunConfig::default();
        config.universe.limit = Some(0);
        assert!(config.validate().is_err());
        config.universe.limit = Some(601);
        assert!(config.validate().is_err());
        config.universe.limit = Some(600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = RunConfig {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unproduced_rule() {
        // Earnings yield is derived from P/E; without P/E no year can rank.
        let mut config = RunConfig::default();
        config.indicators.remove("PE");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Earnings Yield"));

        config.ranking.rules.retain(|rule| rule.name == "ROC");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_panel_config_carries_settings() {
        let config = RunConfig {
            concurrency: 8,
            fetch_timeout_secs: 5,
            ..Default::default()
        };
        let panel = config.panel_config();
        assert_eq!(panel.concurrency, 8);
        assert_eq!(panel.fetch_timeout, Duration::from_secs(5));
        assert_eq!(panel.window, config.window);
        assert_eq!(panel.indicators, config.indicators);
    }

    #[test]
    fn test_partial_json_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"window": {{"start": 2015, "end": 2018}}, "concurrency": 2}}"#).unwrap();

        let config = RunConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.window, YearWindow::new(2015, 2018));
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.ranking.top_n, 10);
    }

    #[test]
    fn test_kpi_table_selection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ROC": 36, "PE": 2, "ROE": 33}}"#).unwrap();

        let table = load_kpi_table(file.path()).unwrap();
        let picked = select_kpis(&table, &["ROE".to_string()]).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked["ROE"], 33);

        assert!(select_kpis(&table, &["EBIT".to_string()]).is_err());
    }
}
