//! Ranking configuration.

use greenblatt_panel::EARNINGS_YIELD;
use greenblatt_traits::{Direction, GreenblattError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default number of instruments kept per ranked year.
pub const DEFAULT_TOP_N: usize = 10;

/// Fewest instruments with complete data for a year to be ranked.
pub const MIN_USABLE_INSTRUMENTS: usize = 2;

/// One indicator taking part in the composite, with its ranking direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRule {
    /// Panel column name.
    pub name: String,
    /// Which end of the scale ranks first.
    pub direction: Direction,
}

impl IndicatorRule {
    /// Create a rule.
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    /// Rule where larger values rank better.
    pub fn higher_is_better(name: impl Into<String>) -> Self {
        Self::new(name, Direction::HigherIsBetter)
    }

    /// Rule where smaller values rank better.
    pub fn lower_is_better(name: impl Into<String>) -> Self {
        Self::new(name, Direction::LowerIsBetter)
    }
}

/// Configuration for composite ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Indicators summed into the composite score.
    pub rules: Vec<IndicatorRule>,

    /// Number of instruments kept per year.
    pub top_n: usize,

    /// Fewest instruments with complete data for a year to be ranked.
    pub min_instruments: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                IndicatorRule::higher_is_better("ROC"),
                IndicatorRule::higher_is_better(EARNINGS_YIELD),
            ],
            top_n: DEFAULT_TOP_N,
            min_instruments: MIN_USABLE_INSTRUMENTS,
        }
    }
}

impl RankingConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GreenblattError::InvalidConfig`] when no rules are given, a
    /// rule is repeated, `top_n` is zero, or `min_instruments` is below
    /// [`MIN_USABLE_INSTRUMENTS`].
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(GreenblattError::InvalidConfig(
                "at least one ranking indicator is required".into(),
            ));
        }
        if self.top_n == 0 {
            return Err(GreenblattError::InvalidConfig(
                "top_n must be at least 1".into(),
            ));
        }
        if self.min_instruments < MIN_USABLE_INSTRUMENTS {
            return Err(GreenblattError::InvalidConfig(format!(
                "min_instruments must be at least {MIN_USABLE_INSTRUMENTS}, got {}",
                self.min_instruments
            )));
        }

        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(GreenblattError::InvalidConfig(format!(
                    "ranking indicator {} listed twice",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_magic_formula() {
        let config = RankingConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.rules.len(), 2);
        assert!(config.rules.iter().all(|r| r.direction.higher_is_better()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let empty = RankingConfig {
            rules: vec![],
            ..Default::default()
        };
        assert!(empty.validate().is_err());

        let zero = RankingConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let dup = RankingConfig {
            rules: vec![
                IndicatorRule::higher_is_better("ROC"),
                IndicatorRule::lower_is_better("ROC"),
            ],
            ..Default::default()
        };
        assert!(dup.validate().is_err());

        for min_instruments in [0, 1] {
            let lax = RankingConfig {
                min_instruments,
                ..Default::default()
            };
            assert!(lax.validate().is_err());
        }
        let strict = RankingConfig {
            min_instruments: 3,
            ..Default::default()
        };
        assert!(strict.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RankingConfig = serde_json::from_str(r#"{"top_n": 5}"#).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.rules, RankingConfig::default().rules);
    }
}
