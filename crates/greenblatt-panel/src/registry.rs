//! KPI registry for discovering and categorizing known indicators.
//!
//! Source ids follow Börsdata's KPI numbering. Each entry carries an explicit
//! ranking direction; nothing is inferred from the indicator's name.

use crate::derived::{EARNINGS_YIELD, PRICE_TO_EARNINGS};
use greenblatt_traits::{Direction, IndicatorId};
use serde::{Deserialize, Serialize};

/// KPI category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KpiCategory {
    /// Returns on capital, equity and assets.
    Profitability,
    /// Price multiples and yields.
    Valuation,
    /// Size measures.
    Size,
}

impl KpiCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Profitability => "Returns generated on the capital a business employs",
            Self::Valuation => "Price paid relative to earnings, sales or book value",
            Self::Size => "Company size measures",
        }
    }
}

/// Metadata about a KPI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiInfo {
    /// Column name used in the panel.
    pub name: &'static str,

    /// Source KPI id, or `None` for fields derived inside the panel.
    pub source_id: Option<IndicatorId>,

    /// Category classification.
    pub category: KpiCategory,

    /// Ranking direction.
    pub direction: Direction,

    /// Human-readable description.
    pub description: &'static str,
}

/// Get information about all known KPIs.
#[must_use]
pub fn available_kpis() -> Vec<KpiInfo> {
    vec![
        // Profitability
        KpiInfo {
            name: "ROC",
            source_id: Some(36),
            category: KpiCategory::Profitability,
            direction: Direction::HigherIsBetter,
            description: "Return on capital",
        },
        KpiInfo {
            name: "ROIC",
            source_id: Some(37),
            category: KpiCategory::Profitability,
            direction: Direction::HigherIsBetter,
            description: "Return on invested capital",
        },
        KpiInfo {
            name: "ROE",
            source_id: Some(33),
            category: KpiCategory::Profitability,
            direction: Direction::HigherIsBetter,
            description: "Return on equity",
        },
        KpiInfo {
            name: "ROA",
            source_id: Some(34),
            category: KpiCategory::Profitability,
            direction: Direction::HigherIsBetter,
            description: "Return on assets",
        },
        // Valuation
        KpiInfo {
            name: PRICE_TO_EARNINGS,
            source_id: Some(2),
            category: KpiCategory::Valuation,
            direction: Direction::LowerIsBetter,
            description: "Price to earnings",
        },
        KpiInfo {
            name: "PS",
            source_id: Some(3),
            category: KpiCategory::Valuation,
            direction: Direction::LowerIsBetter,
            description: "Price to sales",
        },
        KpiInfo {
            name: "PB",
            source_id: Some(4),
            category: KpiCategory::Valuation,
            direction: Direction::LowerIsBetter,
            description: "Price to book",
        },
        KpiInfo {
            name: "EV/EBIT",
            source_id: Some(10),
            category: KpiCategory::Valuation,
            direction: Direction::LowerIsBetter,
            description: "Enterprise value to operating earnings",
        },
        KpiInfo {
            name: EARNINGS_YIELD,
            source_id: None,
            category: KpiCategory::Valuation,
            direction: Direction::HigherIsBetter,
            description: "Earnings relative to price (1 / P/E)",
        },
        // Size
        KpiInfo {
            name: "Market Cap",
            source_id: Some(49),
            category: KpiCategory::Size,
            direction: Direction::HigherIsBetter,
            description: "Market capitalization",
        },
    ]
}

/// Get all KPIs in a specific category.
#[must_use]
pub fn kpis_by_category(category: &KpiCategory) -> Vec<KpiInfo> {
    available_kpis()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific KPI by name (case-insensitive).
#[must_use]
pub fn get_kpi_info(name: &str) -> Option<KpiInfo> {
    available_kpis()
        .into_iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_formula_inputs_registered() {
        let roc = get_kpi_info("roc").unwrap();
        assert_eq!(roc.source_id, Some(36));
        assert_eq!(roc.direction, Direction::HigherIsBetter);

        let pe = get_kpi_info(PRICE_TO_EARNINGS).unwrap();
        assert_eq!(pe.source_id, Some(2));
        assert_eq!(pe.direction, Direction::LowerIsBetter);

        let ey = get_kpi_info(EARNINGS_YIELD).unwrap();
        assert!(ey.source_id.is_none());
        assert_eq!(ey.direction, Direction::HigherIsBetter);

        assert!(get_kpi_info("nonexistent").is_none());
    }

    #[test]
    fn test_kpis_by_category() {
        assert_eq!(kpis_by_category(&KpiCategory::Profitability).len(), 4);
        assert_eq!(kpis_by_category(&KpiCategory::Size).len(), 1);
    }

    #[test]
    fn test_category_descriptions() {
        assert!(!KpiCategory::Profitability.description().is_empty());
        assert!(!KpiCategory::Valuation.description().is_empty());
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = available_kpis().iter().map(|k| k.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
